//! Module: key
//! Responsibility: partition-local key encoding for simple and composite keys.
//! Does not own: entity identifiers or partition naming.
//!
//! Invariants:
//! - Segments are non-empty and never contain the NUL delimiter.
//! - Composite keys are `NUL kind NUL seg1 NUL ... segN NUL`, so encoding is
//!   injective over `(kind, segments)`.
//! - NUL sorts below every other char, so byte order of encoded keys equals
//!   lexicographic order of the segment tuples.
//! - Simple keys never start with NUL, so they can share a partition with
//!   composite keys without colliding.


use crate::error::{ErrorOrigin, InternalError};
use derive_more::Display;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Constants
///

pub const KEY_DELIMITER: char = '\u{0}';

// First char strictly above the delimiter; closes prefix ranges.
const DELIMITER_SUCCESSOR: char = '\u{1}';

///
/// KeyError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("{what} must not be empty")]
    EmptySegment { what: &'static str },

    #[error("{what} '{value}' contains the key delimiter")]
    ContainsDelimiter { what: &'static str, value: String },

    #[error("{what} '{value}' must not contain '{separator}'")]
    ContainsSeparator {
        what: &'static str,
        value: String,
        separator: char,
    },

    #[error("{what} '{value}' is missing the '{separator}' separator")]
    MissingSeparator {
        what: &'static str,
        value: String,
        separator: char,
    },

    #[error("key '{key}' is not a composite key")]
    NotComposite { key: String },

    #[error("key kind '{found}' does not match expected '{expected}'")]
    KindMismatch { expected: KindTag, found: String },

    #[error("key has {found} segments, expected {expected}")]
    Arity { expected: usize, found: usize },
}

impl From<KeyError> for InternalError {
    fn from(err: KeyError) -> Self {
        Self::invalid_key(ErrorOrigin::Key, err.to_string())
    }
}

/// Validate one key segment.
pub fn validate_segment(what: &'static str, value: &str) -> Result<(), KeyError> {
    if value.is_empty() {
        return Err(KeyError::EmptySegment { what });
    }
    if value.contains(KEY_DELIMITER) {
        return Err(KeyError::ContainsDelimiter {
            what,
            value: value.to_string(),
        });
    }

    Ok(())
}

///
/// KindTag
///
/// Fixed object-type tag leading every composite key.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum KindTag {
    #[display("vThingTV")]
    VThing,
    #[display("vSilo")]
    VirtualSilo,
    #[display("vThingVSilo")]
    Membership,
}

impl KindTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VThing => "vThingTV",
            Self::VirtualSilo => "vSilo",
            Self::Membership => "vThingVSilo",
        }
    }

    /// Number of segments a complete key of this kind carries.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::VThing | Self::VirtualSilo => 2,
            Self::Membership => 3,
        }
    }
}

///
/// StorageKey
///
/// Encoded partition-local key. Ordering is the byte order of the encoding.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StorageKey(String);

impl StorageKey {
    /// Encode a simple (single id) key.
    pub fn simple(what: &'static str, id: &str) -> Result<Self, KeyError> {
        validate_segment(what, id)?;

        Ok(Self(id.to_string()))
    }

    /// Encode a complete composite key.
    pub fn composite(kind: KindTag, segments: &[&str]) -> Result<Self, KeyError> {
        if segments.len() != kind.arity() {
            return Err(KeyError::Arity {
                expected: kind.arity(),
                found: segments.len(),
            });
        }

        encode_composite(kind, segments).map(Self)
    }

    /// Rebuild a key from its encoded text, validating composite structure.
    pub fn parse(encoded: &str) -> Result<Self, KeyError> {
        if encoded.starts_with(KEY_DELIMITER) {
            let key = Self(encoded.to_string());
            key.decode()?;

            Ok(key)
        } else {
            Self::simple("key", encoded)
        }
    }

    /// Wrap already-encoded text without validation; range bounds only.
    pub(crate) fn from_encoded(encoded: &str) -> Self {
        Self(encoded.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.0.starts_with(KEY_DELIMITER)
    }

    /// Split a composite key back into its kind and segments.
    pub fn decode(&self) -> Result<(&str, Vec<&str>), KeyError> {
        let not_composite = || KeyError::NotComposite {
            key: self.0.clone(),
        };

        let body = self
            .0
            .strip_prefix(KEY_DELIMITER)
            .and_then(|rest| rest.strip_suffix(KEY_DELIMITER))
            .ok_or_else(not_composite)?;

        let mut parts = body.split(KEY_DELIMITER);
        let kind = parts.next().filter(|k| !k.is_empty()).ok_or_else(not_composite)?;
        let segments: Vec<&str> = parts.collect();

        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(not_composite());
        }

        Ok((kind, segments))
    }

    /// Decode and check the kind tag and arity of a complete key.
    pub fn decode_as(&self, expected: KindTag) -> Result<Vec<&str>, KeyError> {
        let (kind, segments) = self.decode()?;
        if kind != expected.as_str() {
            return Err(KeyError::KindMismatch {
                expected,
                found: kind.to_string(),
            });
        }
        if segments.len() != expected.arity() {
            return Err(KeyError::Arity {
                expected: expected.arity(),
                found: segments.len(),
            });
        }

        Ok(segments)
    }
}

impl fmt::Display for StorageKey {
    // NUL is unreadable in logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.replace(KEY_DELIMITER, "\u{2400}"))
    }
}

///
/// KeyRange
///
/// Half-open `[start, end)` range; `end = None` is unbounded.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyRange {
    start: String,
    end: Option<String>,
}

impl KeyRange {
    /// Every key sharing the `(kind, segments)` prefix.
    ///
    /// Segments may be any leading subset of the kind's arity, including none.
    pub fn prefix(kind: KindTag, segments: &[&str]) -> Result<Self, KeyError> {
        if segments.len() > kind.arity() {
            return Err(KeyError::Arity {
                expected: kind.arity(),
                found: segments.len(),
            });
        }

        let start = encode_composite(kind, segments)?;
        let mut end = start.clone();
        end.pop();
        end.push(DELIMITER_SUCCESSOR);

        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Every simple key in a partition; composite keys are excluded.
    #[must_use]
    pub fn simple_keys() -> Self {
        Self {
            start: DELIMITER_SUCCESSOR.to_string(),
            end: None,
        }
    }

    /// Explicit bounds over raw encoded keys.
    #[must_use]
    pub fn between(start: impl Into<String>, end: Option<String>) -> Self {
        Self {
            start: start.into(),
            end,
        }
    }

    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    #[must_use]
    pub fn contains(&self, key: &StorageKey) -> bool {
        let key = key.as_str();

        key >= self.start.as_str() && self.end.as_deref().is_none_or(|end| key < end)
    }
}

fn encode_composite(kind: KindTag, segments: &[&str]) -> Result<String, KeyError> {
    let capacity = 2 + kind.as_str().len() + segments.iter().map(|s| s.len() + 1).sum::<usize>();
    let mut out = String::with_capacity(capacity);

    out.push(KEY_DELIMITER);
    out.push_str(kind.as_str());
    out.push(KEY_DELIMITER);
    for segment in segments {
        validate_segment("key segment", segment)?;
        out.push_str(segment);
        out.push(KEY_DELIMITER);
    }

    Ok(out)
}
