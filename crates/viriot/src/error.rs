use candid::CandidType;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use viriot_core::{
    db::store::StoreError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{kind}: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Malformed call shape: unknown operation or wrong argument count.
    pub(crate) fn interface(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKey, ErrorOrigin::Interface, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Referenced entity is absent.
    NotFound,

    /// Create collided with an existing record.
    AlreadyExists,

    /// Status precondition not met.
    InvalidState,

    /// Malformed or mismatched identifier, or a malformed call.
    InvalidKey,

    /// Body could not be decoded or encoded.
    Serialization,

    /// The host store or event sink failed. The caller cannot remediate this.
    Store,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::AlreadyExists => Self::AlreadyExists,
            ErrorClass::InvalidState => Self::InvalidState,
            ErrorClass::InvalidKey => Self::InvalidKey,
            ErrorClass::Serialization => Self::Serialization,
            ErrorClass::Store => Self::Store,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Interface,
    Key,
    Lifecycle,
    Provenance,
    Repository,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Interface => Self::Interface,
            CoreErrorOrigin::Key => Self::Key,
            CoreErrorOrigin::Lifecycle => Self::Lifecycle,
            CoreErrorOrigin::Provenance => Self::Provenance,
            CoreErrorOrigin::Repository => Self::Repository,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}
