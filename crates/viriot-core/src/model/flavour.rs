use crate::model::{FlavourId, Status, null_as_default};
use serde::{Deserialize, Serialize};

///
/// Flavour
///
/// Template a virtual silo is instantiated from.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Flavour {
    #[serde(rename = "flavourID")]
    pub flavour_id: String,

    #[serde(default)]
    pub flavour_params: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image_name: Vec<String>,

    #[serde(default)]
    pub flavour_description: String,

    #[serde(default)]
    pub creation_time: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default, deserialize_with = "null_as_default")]
    pub yaml_files: Vec<String>,
}

impl Flavour {
    /// Placeholder registered before the orchestrator fills in the template.
    #[must_use]
    pub fn pending(id: &FlavourId, creation_time: &str) -> Self {
        Self {
            flavour_id: id.to_string(),
            creation_time: creation_time.to_string(),
            status: Status::Pending,
            ..Self::default()
        }
    }
}
