use crate::model::{BrokerProfile, Status, VThing, null_as_default};
use serde::{Deserialize, Serialize};

///
/// ThingVisor
///
/// Adapter process that publishes vthings. The stored document never
/// carries its vthings; those live in their own partition.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ThingVisor {
    #[serde(rename = "thingVisorID")]
    pub thing_visor_id: String,

    #[serde(default)]
    pub creation_time: String,

    #[serde(default)]
    pub tv_description: String,

    #[serde(default)]
    pub status: Status,

    #[serde(rename = "debug_mode", default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub ip_address: String,

    #[serde(default)]
    pub deployment_name: String,

    #[serde(default)]
    pub service_name: String,

    #[serde(rename = "containerID", default)]
    pub container_id: String,

    #[serde(default)]
    pub params: String,

    #[serde(rename = "MQTTDataBroker", default)]
    pub mqtt_data_broker: Option<BrokerProfile>,

    #[serde(rename = "MQTTControlBroker", default)]
    pub mqtt_control_broker: Option<BrokerProfile>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_services_names: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_deployments_names: Vec<String>,
}

///
/// ThingVisorDetail
///
/// Read view of a thing visor with its vthings attached.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ThingVisorDetail {
    #[serde(flatten)]
    pub thing_visor: ThingVisor,

    #[serde(rename = "vThings")]
    pub v_things: Vec<VThing>,
}

///
/// ThingVisorWithVThingKeys
///
/// Read view that also exposes each vthing's encoded storage key, so callers
/// can hand the keys back to DeleteThingVisor.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ThingVisorWithVThingKeys {
    #[serde(rename = "thingVisor")]
    pub thing_visor: ThingVisor,

    #[serde(rename = "vThings")]
    pub v_things: Vec<KeyedVThing>,
}

///
/// KeyedVThing
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyedVThing {
    pub key: String,

    #[serde(rename = "vThing")]
    pub v_thing: VThing,
}
