//! Module: provenance
//! Responsibility: build and emit the per-transaction provenance event.
//! Does not own: the event transport (host `EventSink`).
//!
//! Invariants:
//! - Exactly one event per successful mutation, named after the operation.
//! - Time and transaction id come from the context, never from a clock.
//! - Every edge list starts with `org -> user-{caller}`.
//! - A rejected event fails the whole operation.


use crate::{
    context::TxContext,
    db::store::EventSink,
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::sink::{self, MetricsEvent},
    operation::Operation,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

///
/// Node
///
/// Label of one vertex in the provenance graph.
///

#[derive(Clone, Copy)]
pub enum Node<'a> {
    Org(&'a str),
    User(&'a str),
    ThingVisor(&'a dyn Display),
    VThing(&'a dyn Display),
    Flavour(&'a dyn Display),
    Silo(&'a dyn Display),
}

impl Node<'_> {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Org(org) => (*org).to_string(),
            Self::User(id) => format!("user-{id}"),
            Self::ThingVisor(id) => format!("thingvisor-{id}"),
            Self::VThing(id) => format!("vthing-{id}"),
            Self::Flavour(id) => format!("flavour-{id}"),
            Self::Silo(id) => format!("silo-{id}"),
        }
    }
}

///
/// GraphEdge
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GraphEdge {
    pub start_node: String,
    pub end_node: String,
    pub delete: bool,
}

///
/// ProvenanceEvent
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProvenanceEvent {
    pub event_name: String,
    pub time: String,
    pub tx_id: String,
    pub user_id: String,
    pub user_mspid: String,
    pub graph_nodes: Vec<GraphEdge>,
}

impl ProvenanceEvent {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InternalError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

///
/// Edges
///
/// Ordered edge list for one event, seeded with the caller's org edge.
///

#[derive(Debug)]
pub struct Edges<'c> {
    ctx: &'c TxContext,
    edges: Vec<GraphEdge>,
}

impl<'c> Edges<'c> {
    #[must_use]
    pub fn new(ctx: &'c TxContext) -> Self {
        let caller = ctx.caller();
        let mut edges = Self {
            ctx,
            edges: Vec::new(),
        };
        edges.push(Node::Org(caller.org_id()), Node::User(caller.id()), false);

        edges
    }

    fn push(&mut self, start: Node<'_>, end: Node<'_>, delete: bool) {
        self.edges.push(GraphEdge {
            start_node: start.label(),
            end_node: end.label(),
            delete,
        });
    }

    /// Edge from the caller to a resource.
    #[must_use]
    pub fn from_user(mut self, end: Node<'_>) -> Self {
        let ctx = self.ctx;
        self.push(Node::User(ctx.caller().id()), end, false);
        self
    }

    /// Removal edge from the caller to a resource.
    #[must_use]
    pub fn from_user_removed(mut self, end: Node<'_>) -> Self {
        let ctx = self.ctx;
        self.push(Node::User(ctx.caller().id()), end, true);
        self
    }

    #[must_use]
    pub fn link(mut self, start: Node<'_>, end: Node<'_>) -> Self {
        self.push(start, end, false);
        self
    }

    #[must_use]
    pub fn unlink(mut self, start: Node<'_>, end: Node<'_>) -> Self {
        self.push(start, end, true);
        self
    }

    /// One removal edge per vthing.
    #[must_use]
    pub fn unlink_each<I, D>(mut self, start: Node<'_>, ends: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Display,
    {
        for end in ends {
            self.push(start, Node::VThing(&end), true);
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Emit the event for `op` through the host sink.
    pub fn record<S: EventSink + ?Sized>(
        self,
        sink: &mut S,
        op: Operation,
    ) -> Result<(), InternalError> {
        let caller = self.ctx.caller();
        let event = ProvenanceEvent {
            event_name: op.to_string(),
            time: self.ctx.timestamp_rfc3339(),
            tx_id: self.ctx.tx_id().to_string(),
            user_id: caller.id().to_string(),
            user_mspid: caller.org_id().to_string(),
            graph_nodes: self.edges,
        };

        let payload = serde_json::to_vec(&event).map_err(|err| {
            InternalError::new(ErrorClass::Serialization, ErrorOrigin::Provenance, err.to_string())
        })?;
        sink.set_event(&event.event_name, payload)?;
        sink::record(MetricsEvent::EventEmitted { op });

        Ok(())
    }
}
