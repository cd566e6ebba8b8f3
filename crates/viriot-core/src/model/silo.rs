use crate::model::{BrokerProfile, Status, VSiloId, null_as_default};
use serde::{Deserialize, Serialize};

///
/// VirtualSilo
///
/// Tenant-owned runtime instantiated from a flavour.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct VirtualSilo {
    #[serde(rename = "vSiloID")]
    pub v_silo_id: String,

    #[serde(default)]
    pub v_silo_name: String,

    #[serde(default)]
    pub creation_time: String,

    #[serde(default)]
    pub container_name: String,

    #[serde(rename = "containerID", default)]
    pub container_id: String,

    #[serde(default)]
    pub deployment_name: String,

    #[serde(default)]
    pub service_name: String,

    #[serde(default)]
    pub ip_address: String,

    #[serde(rename = "flavourID", default)]
    pub flavour_id: String,

    #[serde(default)]
    pub flavour_params: String,

    #[serde(rename = "tenantID", default)]
    pub tenant_id: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub port: String,

    #[serde(rename = "MQTTDataBroker", default)]
    pub mqtt_data_broker: Option<BrokerProfile>,

    #[serde(rename = "MQTTControlBroker", default)]
    pub mqtt_control_broker: Option<BrokerProfile>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_services_names: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_deployments_names: Vec<String>,
}

impl VirtualSilo {
    /// Placeholder registered when a silo is first requested.
    #[must_use]
    pub fn pending(id: &VSiloId, creation_time: &str) -> Self {
        Self {
            v_silo_id: id.to_string(),
            v_silo_name: id.flavour().to_string(),
            creation_time: creation_time.to_string(),
            flavour_id: id.flavour().to_string(),
            tenant_id: id.tenant().to_string(),
            status: Status::Pending,
            ..Self::default()
        }
    }
}
