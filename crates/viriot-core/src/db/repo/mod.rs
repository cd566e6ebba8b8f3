//! Module: repo
//! Responsibility: typed document access over one partition per entity kind.
//! Does not own: status rules, provenance, or cascade policy.
//!
//! Invariants:
//! - Stored bytes are the JSON encoding of the typed document.
//! - `insert` never overwrites; `replace` and `remove` never create.
//! - Scans are drained fully before returning, so no iterator outlives a call.

mod document;
#[cfg(test)]
mod tests;

pub use document::Document;

use crate::{
    db::{
        key::{KeyRange, KindTag, StorageKey},
        store::PartitionStore,
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::sink::{self, MetricsEvent},
};
use std::marker::PhantomData;
use tracing::trace;
use viriot_config::CollectionNames;

fn u64_len(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

///
/// Repo
///
/// Handle over the partition holding documents of kind `D`.
///

pub struct Repo<'n, D: Document> {
    collection: &'n str,
    _marker: PhantomData<D>,
}

impl<'n, D: Document> Repo<'n, D> {
    #[must_use]
    pub fn new(names: &'n CollectionNames) -> Self {
        Self {
            collection: D::collection(names),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn collection(&self) -> &'n str {
        self.collection
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn load<S>(&self, store: &S, id: &D::Id) -> Result<Option<D>, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        self.load_key(store, &D::key(id)?)
    }

    pub fn load_key<S>(&self, store: &S, key: &StorageKey) -> Result<Option<D>, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        let Some(bytes) = store.get(self.collection, key)? else {
            return Ok(None);
        };
        sink::record(MetricsEvent::RowsRead {
            collection: self.collection,
            rows: 1,
        });

        self.decode(key, &bytes).map(Some)
    }

    /// Load a document, failing with `NotFound` when it is absent.
    pub fn require<S>(&self, store: &S, id: &D::Id) -> Result<D, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        self.load(store, id)?
            .ok_or_else(|| InternalError::not_found(D::ENTITY, id))
    }

    pub fn exists<S>(&self, store: &S, id: &D::Id) -> Result<bool, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        Ok(store.get(self.collection, &D::key(id)?)?.is_some())
    }

    /// Every document in `range`, in key order.
    pub fn scan<S>(
        &self,
        store: &S,
        range: &KeyRange,
    ) -> Result<Vec<(StorageKey, D)>, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        let mut rows = Vec::new();
        for item in store.scan_range(self.collection, range)? {
            let (key, bytes) = item?;
            let doc = self.decode(&key, &bytes)?;
            rows.push((key, doc));
        }

        sink::record(MetricsEvent::RowsScanned {
            collection: self.collection,
            rows: u64_len(rows.len()),
        });

        Ok(rows)
    }

    /// Every composite-keyed document sharing a leading segment prefix.
    pub fn scan_prefix<S>(
        &self,
        store: &S,
        kind: KindTag,
        segments: &[&str],
    ) -> Result<Vec<(StorageKey, D)>, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        self.scan(store, &KeyRange::prefix(kind, segments)?)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Store a new document; fails with `AlreadyExists` if the key is taken.
    pub fn insert<S>(&self, store: &mut S, id: &D::Id, doc: &D) -> Result<(), InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        let key = D::key(id)?;
        if store.get(self.collection, &key)?.is_some() {
            return Err(InternalError::already_exists(D::ENTITY, id));
        }

        self.write(store, &key, doc)
    }

    /// Overwrite an existing document; fails with `NotFound` if absent.
    pub fn replace<S>(&self, store: &mut S, id: &D::Id, doc: &D) -> Result<(), InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        let key = D::key(id)?;
        if store.get(self.collection, &key)?.is_none() {
            return Err(InternalError::not_found(D::ENTITY, id));
        }

        self.write(store, &key, doc)
    }

    /// Write a document previously loaded in the same transaction.
    pub fn save<S>(&self, store: &mut S, id: &D::Id, doc: &D) -> Result<(), InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        self.write(store, &D::key(id)?, doc)
    }

    /// Delete a document; fails with `NotFound` if absent.
    pub fn remove<S>(&self, store: &mut S, id: &D::Id) -> Result<D, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        let key = D::key(id)?;
        let doc = self
            .load_key(store, &key)?
            .ok_or_else(|| InternalError::not_found(D::ENTITY, id))?;
        self.delete_key(store, &key)?;

        Ok(doc)
    }

    /// Delete by key, tolerating an absent row.
    ///
    /// Returns whether a row was actually removed; only those are counted.
    pub fn delete_key<S>(&self, store: &mut S, key: &StorageKey) -> Result<bool, InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        if store.get(self.collection, key)?.is_none() {
            trace!(collection = self.collection, key = %key, "delete of absent row");
            return Ok(false);
        }

        store.delete(self.collection, key)?;
        trace!(collection = self.collection, key = %key, "delete");
        sink::record(MetricsEvent::RowsDeleted {
            collection: self.collection,
            rows: 1,
        });

        Ok(true)
    }

    fn write<S>(&self, store: &mut S, key: &StorageKey, doc: &D) -> Result<(), InternalError>
    where
        S: PartitionStore + ?Sized,
    {
        let bytes = serde_json::to_vec(doc)?;
        store.put(self.collection, key, bytes)?;
        trace!(collection = self.collection, key = %key, "put");
        sink::record(MetricsEvent::RowsWritten {
            collection: self.collection,
            rows: 1,
        });

        Ok(())
    }

    // Stored rows are trusted to be well formed; a bad row is corruption,
    // not caller input.
    fn decode(&self, key: &StorageKey, bytes: &[u8]) -> Result<D, InternalError> {
        serde_json::from_slice(bytes).map_err(|err| {
            InternalError::new(
                ErrorClass::Serialization,
                ErrorOrigin::Store,
                format!(
                    "corrupt {} row {key} in '{}': {err}",
                    D::ENTITY,
                    self.collection
                ),
            )
        })
    }
}
