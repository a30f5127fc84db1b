//! Flat-file persistence for dream records.
//!
//! The full collection lives in a single JSON document, newest record
//! first. `append` is a full read-modify-write of that file, serialized
//! per-process by a mutex; writers in other processes still race
//! (last writer wins).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::DreamRecord;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DreamStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl DreamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a record at the head of the collection and rewrite the file.
    /// The rewrite is not atomic; a crash mid-write can truncate the file.
    pub async fn append(&self, record: DreamRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut dreams = self.load().await?;
        dreams.insert(0, record);

        let json = serde_json::to_string_pretty(&dreams)?;
        tokio::fs::write(&self.path, json).await?;

        tracing::debug!(path = %self.path.display(), count = dreams.len(), "Dream collection written");

        Ok(())
    }

    /// Load the full collection, newest first. An absent file is an empty
    /// collection; malformed content surfaces as a parse error.
    pub async fn list(&self) -> Result<Vec<DreamRecord>, StorageError> {
        self.load().await
    }

    async fn load(&self) -> Result<Vec<DreamRecord>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }
}
