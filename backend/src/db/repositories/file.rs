//! JSON file repository.
//!
//! The whole collection is one JSON array on disk. It is loaded once on open
//! and kept in memory; every mutation is applied to a copy, written to a
//! temporary sibling file, renamed over the original and only then committed
//! to memory. A `tokio::sync::Mutex` serializes mutations with their writes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use tokio::sync::Mutex;

use super::{apply_draft, find_record, remove_record};
use crate::db::repository::{ErrorContext, LocationRepository, RepositoryError, RepositoryResult};
use crate::models::{LocId, LocationDraft, LocationRecord};

pub struct FileRepository {
    path: PathBuf,
    records: Mutex<Vec<LocationRecord>>,
}

impl FileRepository {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub async fn open(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                RepositoryError::storage_with_context(
                    format!("Failed to parse {}: {}", path.display(), e),
                    ErrorContext::new("open").with_details("invalid_json"),
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(RepositoryError::from(e).with_operation("open")),
        };
        info!(
            "Opened location file {} ({} records)",
            path.display(),
            records.len()
        );
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[LocationRecord]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(records).map_err(|e| {
            RepositoryError::internal(format!("Failed to encode locations: {}", e))
        })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => Ok(tokio::fs::metadata(dir).await.is_ok()),
            None => Ok(true),
        }
    }

    async fn list_all(&self) -> RepositoryResult<Vec<LocationRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn get_by_id(&self, id: &LocId) -> RepositoryResult<LocationRecord> {
        find_record(&self.records.lock().await, id)
    }

    async fn save(&self, draft: LocationDraft) -> RepositoryResult<LocationRecord> {
        let mut guard = self.records.lock().await;
        let mut next = guard.clone();
        let record = apply_draft(&mut next, draft, Utc::now())?;
        self.persist(&next).await.map_err(|e| e.with_operation("save"))?;
        *guard = next;
        Ok(record)
    }

    async fn remove(&self, id: &LocId) -> RepositoryResult<()> {
        let mut guard = self.records.lock().await;
        let mut next = guard.clone();
        remove_record(&mut next, id)?;
        self.persist(&next).await.map_err(|e| e.with_operation("remove"))?;
        *guard = next;
        Ok(())
    }
}
