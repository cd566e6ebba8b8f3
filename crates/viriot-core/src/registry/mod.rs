//! Module: registry
//! Responsibility: the operation surface, one method per registry operation.
//! Does not own: argument routing or the public error shape.
//!
//! Every method runs inside the caller's host transaction. Validation
//! happens before any write is staged, and each successful mutation emits
//! exactly one provenance event as its last step.

mod flavour;
mod membership;
mod silo;
mod thing_visor;
mod vthing;
#[cfg(test)]
mod tests;

use crate::{
    context::TxContext,
    db::{
        repo::{Document, Repo},
        store::TxHost,
    },
    error::{ErrorOrigin, InternalError},
    model::{ThingVisorId, VThingId},
    obs::sink::{MetricsSink, OpOutcome, Span, with_metrics_sink},
    operation::Operation,
    provenance::Edges,
};
use std::rc::Rc;
use tracing::{debug, info, warn};
use viriot_config::{CollectionNames, ConfigError, RegistryConfig};

///
/// Registry
///
/// Long-lived registry handle: validated configuration only, no state.
/// `Default` uses the stock collection names.
///

#[derive(Clone, Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
}

impl Registry {
    /// Build a registry over a validated configuration.
    ///
    /// Each entity kind needs its own partition, so duplicate, empty or
    /// NUL-bearing collection names are refused here.
    pub fn try_new(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Open a session bound to one host transaction.
    pub fn session<'a, H>(&'a self, host: &'a mut H, ctx: &'a TxContext) -> RegistrySession<'a, H>
    where
        H: TxHost + ?Sized,
    {
        let session = RegistrySession::new(&self.config.collections, host, ctx);

        if self.config.debug {
            session.debug()
        } else {
            session
        }
    }
}

///
/// RegistrySession
///
/// Session-scoped handle with policy (debug, metrics) for one transaction.
///

pub struct RegistrySession<'a, H: TxHost + ?Sized> {
    names: &'a CollectionNames,
    host: &'a mut H,
    ctx: &'a TxContext,
    debug: bool,
    metrics: Option<Rc<dyn MetricsSink>>,
}

impl<'a, H: TxHost + ?Sized> RegistrySession<'a, H> {
    #[must_use]
    pub const fn new(names: &'a CollectionNames, host: &'a mut H, ctx: &'a TxContext) -> Self {
        Self {
            names,
            host,
            ctx,
            debug: false,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub fn metrics_sink(mut self, sink: Rc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn context(&self) -> &'a TxContext {
        self.ctx
    }

    // ---------------------------------------------------------------------
    // Shared plumbing
    // ---------------------------------------------------------------------

    /// Run one operation with tracing, metrics and rejection logging.
    fn run<T>(
        &mut self,
        op: Operation,
        f: impl FnOnce(&mut Self) -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        let ctx = self.ctx;
        let sink = self.metrics.clone();

        let exec = || {
            let mut span = Span::new(op, ctx.timestamp_millis());
            debug!(
                op = %op,
                tx_id = ctx.tx_id(),
                caller = ctx.caller().id(),
                "registry operation"
            );

            let result = f(self);
            match &result {
                Ok(_) => {
                    span.set_outcome(OpOutcome::Ok);
                    debug!(
                        op = %op,
                        tx_id = ctx.tx_id(),
                        mutation = op.is_mutation(),
                        "registry operation ok"
                    );
                }
                Err(err) => {
                    span.set_outcome(OpOutcome::Failed(err.class));
                    warn!(
                        op = %op,
                        tx_id = ctx.tx_id(),
                        class = %err.class,
                        origin = %err.origin,
                        "registry operation rejected: {}",
                        err.message
                    );
                }
            }

            result
        };

        match sink {
            Some(sink) => with_metrics_sink(sink, exec),
            None => exec(),
        }
    }

    fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            info!(tx_id = self.ctx.tx_id(), "{}", s.into());
        }
    }

    fn repo<D: Document>(&self) -> Repo<'a, D> {
        Repo::new(self.names)
    }

    fn edges(&self) -> Edges<'a> {
        Edges::new(self.ctx)
    }

    /// Emit the provenance event for a completed mutation.
    fn emit(&mut self, op: Operation, edges: Edges<'_>) -> Result<(), InternalError> {
        self.debug_log(format!("{op}: emitting {} provenance edges", edges.len()));

        edges.record(&mut *self.host, op)
    }
}

/// Reject a body whose embedded id disagrees with the id it is stored under.
fn ensure_body_id(what: &str, path_id: &str, body_id: &str) -> Result<(), InternalError> {
    if path_id == body_id {
        return Ok(());
    }

    Err(InternalError::invalid_key(
        ErrorOrigin::Interface,
        format!("{what} '{body_id}' in body does not match '{path_id}'"),
    ))
}

/// Reject a vthing id whose owner segment names another thing visor.
fn ensure_owner(tv_id: &ThingVisorId, vthing_id: &VThingId) -> Result<(), InternalError> {
    if vthing_id.thing_visor() == tv_id {
        return Ok(());
    }

    Err(InternalError::invalid_key(
        ErrorOrigin::Key,
        format!("vthing {vthing_id} does not belong to thing visor {tv_id}"),
    ))
}
