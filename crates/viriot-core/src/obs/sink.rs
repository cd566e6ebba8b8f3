//! Metrics sink boundary.
//!
//! Registry logic never touches `obs::metrics` directly. All instrumentation
//! flows through `MetricsEvent` and `MetricsSink`.
use crate::{error::ErrorClass, obs::metrics, operation::Operation};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// OpOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpOutcome {
    Ok,
    Failed(ErrorClass),
    /// The span was dropped without an outcome (panic or early exit).
    Aborted,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    OpStart {
        op: Operation,
        at_ms: u64,
    },
    OpFinish {
        op: Operation,
        outcome: OpOutcome,
    },
    RowsRead {
        collection: &'a str,
        rows: u64,
    },
    RowsScanned {
        collection: &'a str,
        rows: u64,
    },
    RowsWritten {
        collection: &'a str,
        rows: u64,
    },
    RowsDeleted {
        collection: &'a str,
        rows: u64,
    },
    EventEmitted {
        op: Operation,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink writing into the thread-local metrics state.

pub(crate) struct GlobalMetricsSink;

impl GlobalMetricsSink {
    fn rows(
        collection: &str,
        rows: u64,
        apply: impl FnOnce(&mut metrics::EventOps, &mut metrics::CollectionCounters, u64),
    ) {
        metrics::with_state_mut(|m| {
            let entry = m.collections.entry(collection.to_string()).or_default();
            apply(&mut m.ops, entry, rows);
        });
    }
}

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::OpStart { op, at_ms } => {
                metrics::with_state_mut(|m| {
                    if m.window_start_ms == 0 {
                        m.window_start_ms = at_ms;
                    }
                    m.ops.calls = m.ops.calls.saturating_add(1);
                    if op.is_mutation() {
                        m.ops.mutations = m.ops.mutations.saturating_add(1);
                    }

                    let entry = m.operations.entry(op.to_string()).or_default();
                    entry.calls = entry.calls.saturating_add(1);
                });
            }

            MetricsEvent::OpFinish { op, outcome } => {
                metrics::with_state_mut(|m| {
                    let entry = m.operations.entry(op.to_string()).or_default();
                    match outcome {
                        OpOutcome::Ok => entry.ok = entry.ok.saturating_add(1),
                        OpOutcome::Failed(class) => {
                            let n = entry.failures.entry(class.as_str().to_string()).or_default();
                            *n = n.saturating_add(1);
                            m.ops.failures = m.ops.failures.saturating_add(1);
                        }
                        OpOutcome::Aborted => {
                            entry.aborted = entry.aborted.saturating_add(1);
                            m.ops.aborted = m.ops.aborted.saturating_add(1);
                        }
                    }
                });
            }

            MetricsEvent::RowsRead { collection, rows } => {
                Self::rows(collection, rows, |ops, entry, rows| {
                    ops.rows_read = ops.rows_read.saturating_add(rows);
                    entry.rows_read = entry.rows_read.saturating_add(rows);
                });
            }

            MetricsEvent::RowsScanned { collection, rows } => {
                Self::rows(collection, rows, |ops, entry, rows| {
                    ops.rows_scanned = ops.rows_scanned.saturating_add(rows);
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows);
                });
            }

            MetricsEvent::RowsWritten { collection, rows } => {
                Self::rows(collection, rows, |ops, entry, rows| {
                    ops.rows_written = ops.rows_written.saturating_add(rows);
                    entry.rows_written = entry.rows_written.saturating_add(rows);
                });
            }

            MetricsEvent::RowsDeleted { collection, rows } => {
                Self::rows(collection, rows, |ops, entry, rows| {
                    ops.rows_deleted = ops.rows_deleted.saturating_add(rows);
                    entry.rows_deleted = entry.rows_deleted.saturating_add(rows);
                });
            }

            MetricsEvent::EventEmitted { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.events_emitted = m.ops.events_emitted.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) fn record(event: MetricsEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start, not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one registry operation.
/// A span dropped without an outcome is recorded as aborted.

pub(crate) struct Span {
    op: Operation,
    outcome: Option<OpOutcome>,
}

impl Span {
    #[must_use]
    pub(crate) fn new(op: Operation, at_ms: u64) -> Self {
        record(MetricsEvent::OpStart { op, at_ms });

        Self { op, outcome: None }
    }

    pub(crate) const fn set_outcome(&mut self, outcome: OpOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        record(MetricsEvent::OpFinish {
            op: self.op,
            outcome: self.outcome.unwrap_or(OpOutcome::Aborted),
        });
    }
}

///
/// TESTS
///
