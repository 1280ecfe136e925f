use crate::error::StoreError;
use crate::graph::BackendId;
use crate::spec::{PersistedRuleRecord, RuleSpec};
use async_trait::async_trait;
use std::sync::Mutex;

/// The remote rule store the sync layer writes to.
///
/// Ids are addressed by their string form (see [`BackendId::as_key`]).
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PersistedRuleRecord>, StoreError>;

    /// Persists a new rule and returns the id the store assigned to it.
    async fn create(&self, spec: &RuleSpec) -> Result<BackendId, StoreError>;

    async fn update(&self, id: &str, spec: &RuleSpec) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// A rule store held entirely in memory. Ids are integers handed out from 1.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<PersistedRuleRecord>,
    last_id: i64,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records. New ids continue after the
    /// highest numeric id present.
    pub fn with_records(records: Vec<PersistedRuleRecord>) -> Self {
        let last_id = records
            .iter()
            .filter_map(|r| match &r.id {
                BackendId::Number(n) => Some(*n),
                BackendId::Text(text) => text.trim().parse().ok(),
            })
            .max()
            .unwrap_or(0);
        Self {
            inner: Mutex::new(MemoryState { records, last_id }),
        }
    }

    /// A copy of every record currently held.
    pub fn records(&self) -> Result<Vec<PersistedRuleRecord>, StoreError> {
        Ok(self.lock()?.records.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn list(&self) -> Result<Vec<PersistedRuleRecord>, StoreError> {
        self.records()
    }

    async fn create(&self, spec: &RuleSpec) -> Result<BackendId, StoreError> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = BackendId::Number(state.last_id);
        state.records.push(PersistedRuleRecord {
            id: id.clone(),
            name: spec.name.clone(),
            spec: spec.clone(),
        });
        Ok(id)
    }

    async fn update(&self, id: &str, spec: &RuleSpec) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id.as_key() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.name = spec.name.clone();
        record.spec = spec.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let before = state.records.len();
        state.records.retain(|r| r.id.as_key() != id);
        if state.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
