use crate::db::{
    key::{KeyRange, StorageKey},
    store::{PartitionStore, ScanIter, StoreError},
};
use std::{collections::BTreeMap, ops::Bound};

///
/// MemoryStore
///

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    partitions: BTreeMap<String, BTreeMap<StorageKey, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored in one partition.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.partitions.get(collection).map_or(0, BTreeMap::len)
    }

    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    #[must_use]
    pub fn keys(&self, collection: &str) -> Vec<StorageKey> {
        self.partitions
            .get(collection)
            .map(|rows| rows.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl PartitionStore for MemoryStore {
    fn get(&self, collection: &str, key: &StorageKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .partitions
            .get(collection)
            .and_then(|rows| rows.get(key))
            .cloned())
    }

    fn put(
        &mut self,
        collection: &str,
        key: &StorageKey,
        value: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.partitions
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), value);

        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &StorageKey) -> Result<(), StoreError> {
        if let Some(rows) = self.partitions.get_mut(collection) {
            rows.remove(key);
        }

        Ok(())
    }

    fn scan_range<'a>(
        &'a self,
        collection: &str,
        range: &KeyRange,
    ) -> Result<ScanIter<'a>, StoreError> {
        let Some(rows) = self.partitions.get(collection) else {
            return Ok(Box::new(std::iter::empty()));
        };

        let start = StorageKey::from_encoded(range.start());
        let end = range.end().map(StorageKey::from_encoded);

        // BTreeMap::range panics on inverted bounds
        if end.as_ref().is_some_and(|end| *end <= start) {
            return Ok(Box::new(std::iter::empty()));
        }

        let upper = end.map_or(Bound::Unbounded, Bound::Excluded);
        let iter = rows
            .range((Bound::Included(start), upper))
            .map(|(key, value)| Ok((key.clone(), value.clone())));

        Ok(Box::new(iter))
    }
}
