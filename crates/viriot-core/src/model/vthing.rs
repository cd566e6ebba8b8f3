use crate::{db::key::KeyError, model::VThingId};
use serde::{Deserialize, Serialize};

///
/// VThing
///
/// Virtual thing exposed by a thing visor. `id` is `{thingVisorId}/{localId}`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VThing {
    #[serde(default)]
    pub label: String,

    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub endpoint: String,
}

impl VThing {
    pub fn vthing_id(&self) -> Result<VThingId, KeyError> {
        VThingId::parse(&self.id)
    }
}
