use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for registry operations.
///
/// The window opens at the host timestamp of the first operation observed
/// after a reset; zero means nothing has been observed yet.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub operations: BTreeMap<String, OperationCounters>,
    pub collections: BTreeMap<String, CollectionCounters>,
    pub window_start_ms: u64,
}

///
/// EventOps
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Entrypoints
    pub calls: u64,
    pub mutations: u64,
    pub failures: u64,
    pub aborted: u64,

    // Provenance
    pub events_emitted: u64,

    // Rows touched
    pub rows_read: u64,
    pub rows_scanned: u64,
    pub rows_written: u64,
    pub rows_deleted: u64,
}

///
/// OperationCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct OperationCounters {
    pub calls: u64,
    pub ok: u64,
    pub aborted: u64,

    // keyed by error class
    pub failures: BTreeMap<String, u64>,
}

impl OperationCounters {
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failures
            .values()
            .fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

///
/// CollectionCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct CollectionCounters {
    pub rows_read: u64,
    pub rows_scanned: u64,
    pub rows_written: u64,
    pub rows_deleted: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters and restart the window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Raw counters since `window_start_ms`.
    pub counters: Option<EventState>,
    /// Per-operation summaries, busiest first.
    pub operations: Vec<OperationSummary>,
}

///
/// OperationSummary
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct OperationSummary {
    pub name: String,
    pub calls: u64,
    pub ok: u64,
    pub failed: u64,
    pub aborted: u64,
    pub failure_ratio: f64,
}

/// Build a report from the in-memory counters.
///
/// A `window_start_ms` later than the current window yields an empty report.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let snap = with_state(Clone::clone);
    if window_start_ms.is_some_and(|since| since > snap.window_start_ms) {
        return EventReport::default();
    }

    let mut operations: Vec<OperationSummary> = snap
        .operations
        .iter()
        .map(|(name, counters)| {
            let failed = counters.failed();
            let failure_ratio = if counters.calls > 0 {
                failed as f64 / counters.calls as f64
            } else {
                0.0
            };

            OperationSummary {
                name: name.clone(),
                calls: counters.calls,
                ok: counters.ok,
                failed,
                aborted: counters.aborted,
                failure_ratio,
            }
        })
        .collect();

    operations.sort_by(|a, b| match b.calls.cmp(&a.calls) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });

    EventReport {
        counters: Some(snap),
        operations,
    }
}

///
/// TESTS
///

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn reset_all_clears_state() {
        with_state_mut(|m| {
            m.ops.calls = 3;
            m.ops.rows_written = 2;
            m.collections
                .insert("things".to_string(), CollectionCounters::default());
        });

        reset_all();

        with_state(|m| {
            assert_eq!(m.ops.calls, 0);
            assert_eq!(m.ops.rows_written, 0);
            assert!(m.collections.is_empty());
        });
    }

    #[test]
    fn report_sorts_operations_by_calls_then_name() {
        reset_all();
        with_state_mut(|m| {
            m.operations.insert(
                "GetFlavour".to_string(),
                OperationCounters {
                    calls: 2,
                    ok: 2,
                    ..Default::default()
                },
            );
            m.operations.insert(
                "AddFlavour".to_string(),
                OperationCounters {
                    calls: 2,
                    ok: 1,
                    failures: BTreeMap::from([("already_exists".to_string(), 1)]),
                    ..Default::default()
                },
            );
            m.operations.insert(
                "StopThingVisor".to_string(),
                OperationCounters {
                    calls: 4,
                    ok: 4,
                    ..Default::default()
                },
            );
        });

        let report = report_window_start(None);
        let names: Vec<_> = report.operations.iter().map(|o| o.name.as_str()).collect();

        assert_eq!(names, ["StopThingVisor", "AddFlavour", "GetFlavour"]);
        assert_eq!(report.operations[1].failed, 1);
        assert_eq!(report.operations[1].failure_ratio, 0.5);
    }

    #[test]
    fn window_start_after_current_window_is_empty() {
        reset_all();
        with_state_mut(|m| m.window_start_ms = 1_000);
        let start = with_state(|m| m.window_start_ms);

        assert!(report_window_start(Some(start)).counters.is_some());
        assert!(
            report_window_start(Some(start.saturating_add(1)))
                .counters
                .is_none()
        );
    }
}
