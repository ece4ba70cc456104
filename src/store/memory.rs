use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    insert_record, insert_saved, summarize, PredictionRecord, RecordStore, StoreSummary,
};

/// In-memory record store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: Mutex<Vec<PredictionRecord>>,
    saved: Mutex<Vec<PredictionRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(mutex: &Mutex<Vec<PredictionRecord>>) -> MutexGuard<'_, Vec<PredictionRecord>> {
        // A poisoned lock still holds a usable record list
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_or_replace(&self, record: PredictionRecord) -> PredictionRecord {
        let mut history = Self::lock(&self.history);
        insert_record(&mut history, record)
    }

    async fn list(&self, offset: usize, limit: usize) -> Vec<PredictionRecord> {
        let history = Self::lock(&self.history);
        history.iter().skip(offset).take(limit).cloned().collect()
    }

    async fn get(&self, id: &str) -> Option<PredictionRecord> {
        let history = Self::lock(&self.history);
        history.iter().find(|r| r.prediction_id == id).cloned()
    }

    async fn delete_by_id(&self, id: &str) -> bool {
        let mut history = Self::lock(&self.history);
        let before = history.len();
        history.retain(|r| r.prediction_id != id);
        history.len() < before
    }

    async fn clear(&self) {
        Self::lock(&self.history).clear();
    }

    async fn count(&self) -> usize {
        Self::lock(&self.history).len()
    }

    async fn aggregate(&self) -> StoreSummary {
        let history = Self::lock(&self.history);
        summarize(&history)
    }

    async fn save(&self, record: PredictionRecord) -> bool {
        let mut saved = Self::lock(&self.saved);
        insert_saved(&mut saved, record)
    }

    async fn saved(&self) -> Vec<PredictionRecord> {
        Self::lock(&self.saved).clone()
    }
}
