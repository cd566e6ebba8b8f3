use super::*;
use crate::{
    model::Flavour,
    obs::{MetricsEvent, MetricsSink, OpOutcome, metrics_report, metrics_reset_all},
    provenance::ProvenanceEvent,
    registry::Registry,
    test_support::ctx,
};
use std::{cell::RefCell, rc::Rc};
use viriot_config::RegistryConfig;

#[derive(Default)]
struct RecordingSink {
    seen: RefCell<Vec<String>>,
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricsEvent<'_>) {
        let line = match event {
            MetricsEvent::OpStart { op, at_ms } => format!("start {op} @{at_ms}"),
            MetricsEvent::OpFinish { op, outcome } => format!("finish {op} {outcome:?}"),
            MetricsEvent::RowsWritten { collection, rows } => format!("write {collection} {rows}"),
            MetricsEvent::EventEmitted { op } => format!("event {op}"),
            _ => return,
        };
        self.seen.borrow_mut().push(line);
    }
}

#[test]
fn each_mutation_emits_one_event_and_reads_emit_none() {
    let mut h = Harness::new();

    h.tx(|s| s.add_flavour("f1")).unwrap();
    h.tx(|s| s.add_virtual_silo("t1_f1", "f1")).unwrap();
    h.seed_thing_visor("tv1", Status::Running);
    h.tx(|s| s.add_vthing_to_thing_visor("tv1", vthing("tv1/a")))
        .unwrap();
    assert_eq!(h.event_count(), 4);

    h.tx(|s| s.get_flavour("f1")).unwrap();
    h.tx(|s| s.get_all_thing_visors()).unwrap();
    h.tx(|s| s.get_vthing_vsilos_by_tenant_id("t1")).unwrap();
    h.tx(|s| s.get_thing_visor_with_vthing_keys("tv1")).unwrap();
    assert_eq!(h.event_count(), 4);

    let names: Vec<_> = h.host.events().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "AddFlavour",
            "AddVirtualSilo",
            "CreateThingVisor",
            "AddVThingToThingVisor"
        ]
    );
}

#[test]
fn event_payload_carries_context() {
    let mut h = Harness::new();
    h.tx(|s| s.add_flavour("f1")).unwrap();

    let raw = h.host.last_event().unwrap();
    let event = ProvenanceEvent::from_bytes(&raw.payload).unwrap();

    assert_eq!(event.event_name, "AddFlavour");
    assert_eq!(event.tx_id, "tx-1");
    assert_eq!(event.user_id, "alice");
    assert_eq!(event.user_mspid, "Org1MSP");
    assert_eq!(event.time, "2024-05-01T12:00:00Z");
}

#[test]
fn rejected_event_aborts_the_whole_mutation() {
    let mut h = Harness::new();
    h.host.reject_events(true);

    let err = h.tx(|s| s.add_flavour("f1")).unwrap_err();

    assert_eq!(err.class, ErrorClass::Store);
    assert_eq!(err.origin, ErrorOrigin::Provenance);

    h.host.reject_events(false);
    assert!(h.tx(|s| s.get_flavour("f1")).unwrap_err().is_not_found());
    assert_eq!(h.event_count(), 0);
}

#[test]
fn failed_operation_leaves_store_and_log_untouched() {
    let mut h = Harness::new();
    h.tx(|s| s.add_flavour("f1")).unwrap();

    let body = Flavour {
        flavour_id: "f2".to_string(),
        ..Flavour::default()
    };
    h.tx(|s| s.update_flavour("f1", body)).unwrap_err();

    assert_eq!(h.tx(|s| s.get_flavour("f1")).unwrap().flavour_id, "f1");
    assert_eq!(h.event_count(), 1);
}

#[test]
fn session_sink_receives_the_operation_span() {
    let mut h = Harness::new();
    let sink = Rc::new(RecordingSink::default());
    let ctx = ctx();
    let registry = Registry::default();
    let at_ms = ctx.timestamp_millis();

    h.host
        .execute(|tx| {
            registry
                .session(tx, &ctx)
                .metrics_sink(sink.clone())
                .add_flavour("f1")
        })
        .unwrap();

    let seen = sink.seen.borrow();
    assert_eq!(
        *seen,
        [
            format!("start AddFlavour @{at_ms}"),
            "write collectionFlavours 1".to_string(),
            "event AddFlavour".to_string(),
            "finish AddFlavour Ok".to_string(),
        ]
    );
}

#[test]
fn global_metrics_count_calls_and_failures() {
    metrics_reset_all();
    let mut h = Harness::new();

    h.tx(|s| s.add_flavour("f1")).unwrap();
    h.tx(|s| s.add_flavour("f1")).unwrap_err();
    h.tx(|s| s.get_flavour("f1")).unwrap();

    let report = metrics_report(None);
    let counters = report.counters.unwrap();
    assert_eq!(counters.ops.calls, 3);
    assert_eq!(counters.ops.mutations, 2);
    assert_eq!(counters.ops.failures, 1);
    assert_eq!(counters.ops.events_emitted, 1);
    assert_eq!(counters.window_start_ms, ctx().timestamp_millis());

    let add = report
        .operations
        .iter()
        .find(|o| o.name == "AddFlavour")
        .unwrap();
    assert_eq!((add.calls, add.ok, add.failed), (2, 1, 1));

    let later = ctx().timestamp_millis() + 1;
    assert!(metrics_report(Some(later)).counters.is_none());
}

#[test]
fn outcome_is_recorded_per_error_class() {
    let sink = Rc::new(RecordingSink::default());
    let mut h = Harness::new();
    let ctx = ctx();
    let registry = Registry::default();

    h.host
        .execute(|tx| {
            registry
                .session(tx, &ctx)
                .metrics_sink(sink.clone())
                .get_flavour("missing")
        })
        .unwrap_err();

    let expected = format!("finish GetFlavour {:?}", OpOutcome::Failed(ErrorClass::NotFound));
    assert_eq!(sink.seen.borrow().last(), Some(&expected));
}

#[test]
fn debug_sessions_behave_like_plain_ones() {
    let mut h = Harness::new();
    h.registry = Registry::try_new(RegistryConfig {
        debug: true,
        ..RegistryConfig::default()
    })
    .unwrap();

    h.seed_thing_visor("tv1", Status::Running);
    h.tx(|s| s.stop_thing_visor("tv1")).unwrap();

    assert_eq!(
        h.tx(|s| s.get_thing_visor("tv1")).unwrap().thing_visor.status,
        Status::Stopping
    );
    assert_eq!(h.event_count(), 2);
}
