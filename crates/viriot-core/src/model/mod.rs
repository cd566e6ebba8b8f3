//! Entity documents and identifiers.
//!
//! Bodies are strict: unknown fields are rejected at the boundary. Field
//! names match the wire format used by the orchestrator.

mod flavour;
mod ids;
mod membership;
mod silo;
mod status;
mod thing_visor;
mod vthing;

pub use flavour::Flavour;
pub use ids::{FlavourId, MembershipId, TenantId, ThingVisorId, VSiloId, VThingId};
pub use membership::Membership;
pub use silo::VirtualSilo;
pub use status::Status;
pub use thing_visor::{KeyedVThing, ThingVisor, ThingVisorDetail, ThingVisorWithVThingKeys};
pub use vthing::VThing;

use serde::{Deserialize, Deserializer, Serialize};

///
/// BrokerProfile
///
/// MQTT broker endpoint advertised by a thing visor or silo.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerProfile {
    pub ip: String,
    pub port: String,
}

/// Orchestrators serialize empty lists as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
