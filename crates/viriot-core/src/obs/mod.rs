//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Counters are process-local and ephemeral. They are never written to the
//! ledger and never influence a transaction's outcome.
//!
//! Row counters are recorded as writes are staged, so they include attempts
//! whose transaction the host later discards. Deletes count only rows that
//! existed.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{
    CollectionCounters, EventOps, EventReport, EventState, OperationCounters, OperationSummary,
};
pub use sink::{
    MetricsEvent, MetricsSink, OpOutcome, metrics_report, metrics_reset_all, with_metrics_sink,
};
