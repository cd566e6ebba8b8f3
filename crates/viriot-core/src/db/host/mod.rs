//! In-memory host collaborators.
//!
//! Contract:
//! - `MemoryStore` is a plain ordered partition store with immediate writes.
//! - `StagedTx` buffers every write and the single event of one transaction
//!   over a read-only base store.
//! - `MemoryHost::execute` applies a staged transaction only when the
//!   operation returns `Ok`; a failed operation leaves no trace.

mod memory;
mod staged;

pub use memory::MemoryStore;
pub use staged::{StagedCommit, StagedTx};

use crate::db::store::StoreError;

///
/// EmittedEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmittedEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

///
/// MemoryHost
///
/// Single-threaded stand-in for the transaction-execution environment.
///

#[derive(Debug, Default)]
pub struct MemoryHost {
    store: MemoryStore,
    events: Vec<EmittedEvent>,
    reject_events: bool,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one operation as an atomic transaction.
    pub fn execute<T, E>(
        &mut self,
        f: impl FnOnce(&mut StagedTx<'_, MemoryStore>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut tx = StagedTx::new(&self.store);
        if self.reject_events {
            tx.reject_events();
        }

        let out = f(&mut tx)?;
        let commit = tx.into_commit();
        if let Some(event) = commit.apply(&mut self.store)? {
            self.events.push(event);
        }

        Ok(out)
    }

    /// Make every subsequent event emission fail.
    pub const fn reject_events(&mut self, reject: bool) {
        self.reject_events = reject;
    }

    #[must_use]
    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    #[must_use]
    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    #[must_use]
    pub fn last_event(&self) -> Option<&EmittedEvent> {
        self.events.last()
    }
}
