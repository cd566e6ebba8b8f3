//! ## Crate layout
//! - `config`: registry configuration (collection names, debug logging).
//! - `core`: keys, store adapters, entities, lifecycle, provenance, metrics.
//! - `error`: the public error type returned across the call boundary.
//! - `router`: dispatch of a raw argument list to one registry operation.
//!
//! Embedders either call `RegistrySession` methods directly or hand the raw
//! call to [`invoke`] inside their own transaction.

pub use viriot_config as config;
pub use viriot_core as core;

pub mod error;
pub mod router;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, ErrorKind, ErrorOrigin};
pub use router::invoke;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, ErrorKind, invoke};
    pub use viriot_config::RegistryConfig;
    pub use viriot_core::{prelude::*, registry::Registry};
}
