//! Registry configuration.
//!
//! The registry never reads configuration on its own; embedders parse a
//! [`RegistryConfig`] (usually from TOML), validate it once, and hand the
//! value to the registry.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// Constants
///

pub const DEFAULT_THING_VISORS: &str = "collectionThingVisors";
pub const DEFAULT_VTHINGS: &str = "collectionvThingTVs";
pub const DEFAULT_MEMBERSHIPS: &str = "collectionvThingVSilos";
pub const DEFAULT_SILOS: &str = "collectionvSilos";
pub const DEFAULT_FLAVOURS: &str = "collectionFlavours";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

///
/// RegistryConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Verbose per-write logging for every registry session.
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub collections: CollectionNames,
}

impl RegistryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    /// Check collection naming invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();

        for (field, name) in self.collections.entries() {
            if name.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "collection '{field}' must not be empty"
                )));
            }
            if name.contains('\0') {
                return Err(ConfigError::invalid(format!(
                    "collection '{field}' must not contain NUL"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::invalid(format!(
                    "collection name '{name}' is used more than once"
                )));
            }
        }

        Ok(())
    }
}

///
/// CollectionNames
///
/// One partition per entity kind.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionNames {
    pub thing_visors: String,
    pub vthings: String,
    pub memberships: String,
    pub silos: String,
    pub flavours: String,
}

impl CollectionNames {
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("thing_visors", self.thing_visors.as_str()),
            ("vthings", self.vthings.as_str()),
            ("memberships", self.memberships.as_str()),
            ("silos", self.silos.as_str()),
            ("flavours", self.flavours.as_str()),
        ]
    }
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            thing_visors: DEFAULT_THING_VISORS.to_string(),
            vthings: DEFAULT_VTHINGS.to_string(),
            memberships: DEFAULT_MEMBERSHIPS.to_string(),
            silos: DEFAULT_SILOS.to_string(),
            flavours: DEFAULT_FLAVOURS.to_string(),
        }
    }
}
