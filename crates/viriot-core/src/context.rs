//! Ambient execution context supplied by the host for one transaction.
//!
//! Every value that would otherwise be generated locally (time, ids) comes
//! from here so a re-executed transaction produces identical writes.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

///
/// Caller
///
/// Trusted caller identity as reported by the host.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Caller {
    id: String,
    org_id: String,
}

impl Caller {
    pub fn new(id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            org_id: org_id.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn org_id(&self) -> &str {
        &self.org_id
    }
}

///
/// TxContext
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxContext {
    tx_id: String,
    timestamp: OffsetDateTime,
    caller: Caller,
    args: Vec<String>,
}

impl TxContext {
    pub fn new(tx_id: impl Into<String>, timestamp: OffsetDateTime, caller: Caller) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            caller,
            args: Vec::new(),
        }
    }

    /// Attach the raw argument list of the call (operation name first).
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// Timestamp rendered as RFC 3339.
    ///
    /// Falls back to the unix seconds when the timestamp is outside the
    /// RFC 3339 year range, so formatting never aborts a transaction.
    #[must_use]
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.timestamp.unix_timestamp().to_string())
    }

    /// Milliseconds since the unix epoch, saturating at zero before it.
    #[must_use]
    pub fn timestamp_millis(&self) -> u64 {
        let millis = self.timestamp.unix_timestamp_nanos() / 1_000_000;

        u64::try_from(millis).unwrap_or(0)
    }

    #[must_use]
    pub const fn caller(&self) -> &Caller {
        &self.caller
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}
