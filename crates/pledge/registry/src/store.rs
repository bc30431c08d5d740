//! Storage contract for pledge records and its in-memory implementation.
//!
//! One record per identity carries the commitment and both associated
//! fields, so a single `save` publishes every field of an operation at once.

use std::collections::BTreeMap;
use std::sync::RwLock;

use pledge_types::{PledgeRecord, PrincipalId, StorageError};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage interface for pledge records keyed by owner.
pub trait PledgeStore: Send + Sync {
    /// Get the record for `owner`, if any field of it is stored.
    fn load(&self, owner: &PrincipalId) -> StorageResult<Option<PledgeRecord>>;

    /// Insert or replace the record for `record.owner`.
    fn save(&self, record: PledgeRecord) -> StorageResult<()>;

    /// Drop the record entirely. Returns whether something was removed.
    fn remove(&self, owner: &PrincipalId) -> StorageResult<bool>;

    /// All stored records, ordered by owner.
    fn records(&self) -> StorageResult<Vec<PledgeRecord>>;
}

/// In-memory pledge store.
#[derive(Default)]
pub struct InMemoryPledgeStore {
    records: RwLock<BTreeMap<PrincipalId, PledgeRecord>>,
}

impl InMemoryPledgeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::Backend("pledge records lock poisoned".to_string())
}

impl PledgeStore for InMemoryPledgeStore {
    fn load(&self, owner: &PrincipalId) -> StorageResult<Option<PledgeRecord>> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.get(owner).cloned())
    }

    fn save(&self, record: PledgeRecord) -> StorageResult<()> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        guard.insert(record.owner.clone(), record);
        Ok(())
    }

    fn remove(&self, owner: &PrincipalId) -> StorageResult<bool> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        Ok(guard.remove(owner).is_some())
    }

    fn records(&self) -> StorageResult<Vec<PledgeRecord>> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.values().cloned().collect())
    }
}
