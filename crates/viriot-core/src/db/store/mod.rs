//! Partition store adapter.
//!
//! Thin contract over the host key-value store. Every call participates in
//! the ambient host transaction; there is no commit call here. Scan
//! iterators borrow the store, so they are always released before the next
//! write in the same operation.

use crate::{
    db::key::{KeyRange, KindTag, StorageKey},
    error::{ErrorOrigin, InternalError},
};
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Failure reported by a host collaborator.
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store backend failure on '{collection}': {message}")]
    Backend { collection: String, message: String },

    #[error("event '{name}' rejected: {message}")]
    EventRejected { name: String, message: String },
}

impl StoreError {
    pub fn backend(collection: &str, message: impl Into<String>) -> Self {
        Self::Backend {
            collection: collection.to_string(),
            message: message.into(),
        }
    }

    pub fn event_rejected(name: &str, message: impl Into<String>) -> Self {
        Self::EventRejected {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        let origin = match err {
            StoreError::Backend { .. } => ErrorOrigin::Store,
            StoreError::EventRejected { .. } => ErrorOrigin::Provenance,
        };

        Self::store(origin, err.to_string())
    }
}

///
/// ScanIter
///
/// Ordered, finite scan over one partition.
///

pub type ScanItem = (StorageKey, Vec<u8>);
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<ScanItem, StoreError>> + 'a>;

///
/// PartitionStore
///

pub trait PartitionStore {
    fn get(&self, collection: &str, key: &StorageKey) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&mut self, collection: &str, key: &StorageKey, value: Vec<u8>)
    -> Result<(), StoreError>;

    /// Deleting an absent key is not an error.
    fn delete(&mut self, collection: &str, key: &StorageKey) -> Result<(), StoreError>;

    fn scan_range<'a>(
        &'a self,
        collection: &str,
        range: &KeyRange,
    ) -> Result<ScanIter<'a>, StoreError>;

    fn scan_prefix<'a>(
        &'a self,
        collection: &str,
        kind: KindTag,
        segments: &[&str],
    ) -> Result<ScanIter<'a>, InternalError> {
        let range = KeyRange::prefix(kind, segments)?;

        Ok(self.scan_range(collection, &range)?)
    }
}

///
/// EventSink
///
/// Host-side event channel shared with the state mutation's transaction.
///

pub trait EventSink {
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StoreError>;
}

///
/// TxHost
///
/// Everything an operation needs from the host besides the context.
///

pub trait TxHost: PartitionStore + EventSink {}

impl<T: PartitionStore + EventSink + ?Sized> TxHost for T {}
