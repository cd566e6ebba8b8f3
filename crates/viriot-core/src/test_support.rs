//! Fixtures shared by the in-crate test modules.

use crate::{
    context::{Caller, TxContext},
    db::host::{MemoryHost, MemoryStore, StagedTx},
    error::InternalError,
    model::{Membership, Status, ThingVisor, VThing},
    provenance::ProvenanceEvent,
    registry::{Registry, RegistrySession},
};
use time::macros::datetime;

pub(crate) fn ctx() -> TxContext {
    TxContext::new(
        "tx-1",
        datetime!(2024-05-01 12:00 UTC),
        Caller::new("alice", "Org1MSP"),
    )
}

pub(crate) fn thing_visor(id: &str, status: Status) -> ThingVisor {
    ThingVisor {
        thing_visor_id: id.to_string(),
        tv_description: format!("{id} description"),
        status,
        ..ThingVisor::default()
    }
}

pub(crate) fn vthing(id: &str) -> VThing {
    VThing {
        label: format!("{id} label"),
        id: id.to_string(),
        kind: "sensor".to_string(),
        ..VThing::default()
    }
}

pub(crate) fn membership(tenant: &str, silo: &str, vthing: &str) -> Membership {
    Membership {
        tenant_id: tenant.to_string(),
        v_silo_id: silo.to_string(),
        creation_time: "2024-05-01T12:00:00Z".to_string(),
        v_thing_id: vthing.to_string(),
    }
}

///
/// Harness
///
/// A registry plus an in-memory host; every call runs as one transaction.
///

pub(crate) type Session<'a, 's> = RegistrySession<'a, StagedTx<'s, MemoryStore>>;

pub(crate) struct Harness {
    pub registry: Registry,
    pub host: MemoryHost,
    pub ctx: TxContext,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            registry: Registry::default(),
            host: MemoryHost::new(),
            ctx: ctx(),
        }
    }

    /// Run `f` as one committed-or-discarded transaction.
    pub(crate) fn tx<T>(
        &mut self,
        f: impl FnOnce(&mut Session<'_, '_>) -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        let registry = &self.registry;
        let ctx = &self.ctx;

        self.host.execute(|tx| {
            let mut session = registry.session(tx, ctx);
            f(&mut session)
        })
    }

    /// Set up a thing visor with the given status.
    pub(crate) fn seed_thing_visor(&mut self, id: &str, status: Status) {
        self.tx(|s| s.create_thing_visor(id, thing_visor(id, status)))
            .unwrap();
    }

    pub(crate) fn event_count(&self) -> usize {
        self.host.events().len()
    }

    pub(crate) fn last_event(&self) -> ProvenanceEvent {
        let event = self.host.last_event().expect("an event was emitted");

        ProvenanceEvent::from_bytes(&event.payload).unwrap()
    }
}

/// `(start, end, delete)` triples of an event, for compact assertions.
pub(crate) fn edge_triples(event: &ProvenanceEvent) -> Vec<(String, String, bool)> {
    event
        .graph_nodes
        .iter()
        .map(|e| (e.start_node.clone(), e.end_node.clone(), e.delete))
        .collect()
}
