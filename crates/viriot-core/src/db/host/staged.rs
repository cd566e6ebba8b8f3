use crate::db::{
    host::EmittedEvent,
    key::{KeyRange, StorageKey},
    store::{EventSink, PartitionStore, ScanIter, StoreError},
};
use std::collections::BTreeMap;

// Latest staged value per key; `None` is a pending delete.
type WriteSet = BTreeMap<String, BTreeMap<StorageKey, Option<Vec<u8>>>>;

///
/// StagedTx
///
/// Write-set overlay over a read-only base store.
/// Reads observe the transaction's own staged writes.
///

pub struct StagedTx<'s, S: PartitionStore + ?Sized> {
    base: &'s S,
    writes: WriteSet,
    event: Option<EmittedEvent>,
    reject_events: bool,
}

impl<'s, S: PartitionStore + ?Sized> StagedTx<'s, S> {
    pub fn new(base: &'s S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
            event: None,
            reject_events: false,
        }
    }

    pub(crate) const fn reject_events(&mut self) {
        self.reject_events = true;
    }

    /// Number of keys with a pending write.
    #[must_use]
    pub fn staged_len(&self) -> usize {
        self.writes.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn into_commit(self) -> StagedCommit {
        StagedCommit {
            writes: self.writes,
            event: self.event,
        }
    }

    fn staged(&self, collection: &str, key: &StorageKey) -> Option<&Option<Vec<u8>>> {
        self.writes.get(collection).and_then(|rows| rows.get(key))
    }

    fn stage(&mut self, collection: &str, key: &StorageKey, value: Option<Vec<u8>>) {
        self.writes
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), value);
    }
}

impl<S: PartitionStore + ?Sized> PartitionStore for StagedTx<'_, S> {
    fn get(&self, collection: &str, key: &StorageKey) -> Result<Option<Vec<u8>>, StoreError> {
        match self.staged(collection, key) {
            Some(value) => Ok(value.clone()),
            None => self.base.get(collection, key),
        }
    }

    fn put(
        &mut self,
        collection: &str,
        key: &StorageKey,
        value: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.stage(collection, key, Some(value));

        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &StorageKey) -> Result<(), StoreError> {
        self.stage(collection, key, None);

        Ok(())
    }

    fn scan_range<'a>(
        &'a self,
        collection: &str,
        range: &KeyRange,
    ) -> Result<ScanIter<'a>, StoreError> {
        // Phase 1: drain the base scan inside the range.
        let mut merged = BTreeMap::new();
        for item in self.base.scan_range(collection, range)? {
            let (key, value) = item?;
            merged.insert(key, value);
        }

        // Phase 2: overlay staged writes, hiding staged deletes.
        if let Some(rows) = self.writes.get(collection) {
            for (key, value) in rows.iter().filter(|(key, _)| range.contains(key)) {
                match value {
                    Some(value) => {
                        merged.insert(key.clone(), value.clone());
                    }
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }

        Ok(Box::new(merged.into_iter().map(Ok)))
    }
}

impl<S: PartitionStore + ?Sized> EventSink for StagedTx<'_, S> {
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        if self.reject_events {
            return Err(StoreError::event_rejected(name, "event sink unavailable"));
        }
        if let Some(existing) = &self.event {
            return Err(StoreError::event_rejected(
                name,
                format!(
                    "transaction already emitted event '{}'; only one event per transaction",
                    existing.name
                ),
            ));
        }

        self.event = Some(EmittedEvent {
            name: name.to_string(),
            payload,
        });

        Ok(())
    }
}

///
/// StagedCommit
///
/// Complete write-set of a finished transaction, ready to apply.
///

#[derive(Debug, Default)]
pub struct StagedCommit {
    writes: WriteSet,
    event: Option<EmittedEvent>,
}

impl StagedCommit {
    /// Apply every staged write to the target, returning the event to publish.
    pub fn apply<S: PartitionStore + ?Sized>(
        self,
        target: &mut S,
    ) -> Result<Option<EmittedEvent>, StoreError> {
        for (collection, rows) in self.writes {
            for (key, value) in rows {
                match value {
                    Some(value) => target.put(&collection, &key, value)?,
                    None => target.delete(&collection, &key)?,
                }
            }
        }

        Ok(self.event)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.values().all(BTreeMap::is_empty) && self.event.is_none()
    }
}
