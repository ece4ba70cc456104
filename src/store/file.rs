use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, warn};

use super::{
    insert_record, insert_saved, summarize, PredictionRecord, RecordStore, StoreSummary,
};
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};

/// File name of the primary prediction history.
const HISTORY_FILE: &str = "cardio_predictions.json";

/// File name of the bookmark list.
const SAVED_FILE: &str = "saved_predictions.json";

/// JSON-file-backed record store.
///
/// Each list lives in one JSON file under the data directory and is rewritten
/// whole on every mutation. A file that is missing, unreadable, or corrupt
/// reads as an empty list; a failed write drops the update. Both paths are
/// logged and neither propagates - losing a record beats crashing the
/// session.
pub struct FileStore {
    history_path: PathBuf,
    saved_path: PathBuf,
}

impl FileStore {
    /// Open the store under the configured data directory, creating it if
    /// missing.
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.data_dir).map_err(|e| StorageError::DataDir {
            message: format!(
                "Failed to create data directory {}: {}",
                config.data_dir.display(),
                e
            ),
        })?;

        Ok(Self {
            history_path: config.data_dir.join(HISTORY_FILE),
            saved_path: config.data_dir.join(SAVED_FILE),
        })
    }

    fn load(path: &Path) -> Vec<PredictionRecord> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Record file unreadable, treating store as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Record file corrupt, treating store as empty");
                Vec::new()
            }
        }
    }

    fn persist(path: &Path, records: &[PredictionRecord]) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to encode records, update dropped");
                return;
            }
        };

        if let Err(e) = fs::write(path, json) {
            error!(path = %path.display(), error = %e, "Failed to persist records, update dropped");
        }
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn insert_or_replace(&self, record: PredictionRecord) -> PredictionRecord {
        let mut records = Self::load(&self.history_path);
        let stored = insert_record(&mut records, record);
        Self::persist(&self.history_path, &records);
        stored
    }

    async fn list(&self, offset: usize, limit: usize) -> Vec<PredictionRecord> {
        Self::load(&self.history_path)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    async fn get(&self, id: &str) -> Option<PredictionRecord> {
        Self::load(&self.history_path)
            .into_iter()
            .find(|r| r.prediction_id == id)
    }

    async fn delete_by_id(&self, id: &str) -> bool {
        let mut records = Self::load(&self.history_path);
        let before = records.len();
        records.retain(|r| r.prediction_id != id);
        let removed = records.len() < before;
        if removed {
            Self::persist(&self.history_path, &records);
        }
        removed
    }

    async fn clear(&self) {
        Self::persist(&self.history_path, &[]);
    }

    async fn count(&self) -> usize {
        Self::load(&self.history_path).len()
    }

    async fn aggregate(&self) -> StoreSummary {
        summarize(&Self::load(&self.history_path))
    }

    async fn save(&self, record: PredictionRecord) -> bool {
        let mut records = Self::load(&self.saved_path);
        let added = insert_saved(&mut records, record);
        if added {
            Self::persist(&self.saved_path, &records);
        }
        added
    }

    async fn saved(&self) -> Vec<PredictionRecord> {
        Self::load(&self.saved_path)
    }
}
