use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every error aborts the enclosing host transaction; nothing here retries.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Referenced entity is absent.
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Repository,
            format!("{entity} {id} does not exist"),
        )
    }

    /// Create collided with an existing key.
    pub fn already_exists(entity: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::AlreadyExists,
            ErrorOrigin::Repository,
            format!("{entity} {id} already exists"),
        )
    }

    /// Status precondition not met.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidState, ErrorOrigin::Lifecycle, message)
    }

    /// Malformed or mismatched compound identifier.
    pub fn invalid_key(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidKey, origin, message)
    }

    /// Malformed input body or stored document.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Serialization, ErrorOrigin::Serialize, message)
    }

    /// Underlying store or event sink failed.
    pub fn store(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Store, origin, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorClass {
    NotFound,
    AlreadyExists,
    InvalidState,
    InvalidKey,
    Serialization,
    Store,
}

impl ErrorClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidState => "invalid_state",
            Self::InvalidKey => "invalid_key",
            Self::Serialization => "serialization",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Key,
    Store,
    Serialize,
    Repository,
    Lifecycle,
    Provenance,
    Interface,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Key => "key",
            Self::Store => "store",
            Self::Serialize => "serialize",
            Self::Repository => "repository",
            Self::Lifecycle => "lifecycle",
            Self::Provenance => "provenance",
            Self::Interface => "interface",
        };
        write!(f, "{label}")
    }
}

impl From<serde_json::Error> for InternalError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
