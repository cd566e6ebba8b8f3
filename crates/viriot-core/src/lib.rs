//! Core runtime for the VirIoT registry: composite keys, the partition store
//! adapter, entity repositories, the status state machine, the provenance
//! log, and the registry session that ties them together per operation.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod context;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod obs;
pub mod operation;
pub mod provenance;
pub mod registry;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        context::{Caller, TxContext},
        model::{
            BrokerProfile, Flavour, FlavourId, Membership, Status, TenantId, ThingVisor,
            ThingVisorDetail, ThingVisorId, VSiloId, VThing, VThingId, VirtualSilo,
        },
        operation::Operation,
    };
}
