use serde::{Deserialize, Serialize};

///
/// Membership
///
/// Attachment of one vthing to one virtual silo.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Membership {
    #[serde(rename = "tenantID")]
    pub tenant_id: String,

    #[serde(rename = "vSiloID")]
    pub v_silo_id: String,

    #[serde(rename = "creationTime", default)]
    pub creation_time: String,

    #[serde(rename = "vThingID")]
    pub v_thing_id: String,
}
