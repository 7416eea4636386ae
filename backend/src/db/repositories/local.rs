//! In-memory local repository implementation.
//!
//! Records live in a `Vec` behind a `parking_lot::RwLock`, which keeps
//! insertion order and makes every call deterministic and isolated.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{apply_draft, find_record, remove_record};
use crate::db::repository::{LocationRepository, RepositoryError, RepositoryResult};
use crate::models::{LocId, LocationDraft, LocationRecord};

/// In-memory local repository.
///
/// # Example
/// ```
/// use travel_tip::db::{LocalRepository, LocationRepository};
/// use travel_tip::models::{GeoPoint, LocationDraft};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.save(LocationDraft::create("Jaffa", 4, GeoPoint::new(32.05, 34.75, "")))
///         .await
///         .unwrap();
///     assert_eq!(repo.list_all().await.unwrap().len(), 1);
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    records: Vec<LocationRecord>,
    // Connection health, toggled by tests.
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `records`, kept as given.
    pub fn with_records(records: Vec<LocationRecord>) -> Self {
        let repo = Self::new();
        repo.data.write().records = records;
        repo
    }

    /// Insert a fully formed record, bypassing draft handling.
    pub fn insert_record(&self, record: LocationRecord) {
        self.data.write().records.push(record);
    }

    /// Set the health status for testing failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        self.data.write().records.clear();
    }

    pub fn len(&self) -> usize {
        self.data.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().records.is_empty()
    }

    fn ensure_healthy(&self) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::storage("Local repository is unavailable"))
        }
    }
}

#[async_trait]
impl LocationRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<LocationRecord>> {
        self.ensure_healthy()?;
        Ok(self.data.read().records.clone())
    }

    async fn get_by_id(&self, id: &LocId) -> RepositoryResult<LocationRecord> {
        self.ensure_healthy()?;
        find_record(&self.data.read().records, id)
    }

    async fn save(&self, draft: LocationDraft) -> RepositoryResult<LocationRecord> {
        self.ensure_healthy()?;
        apply_draft(&mut self.data.write().records, draft, Utc::now())
    }

    async fn remove(&self, id: &LocId) -> RepositoryResult<()> {
        self.ensure_healthy()?;
        remove_record(&mut self.data.write().records, id)
    }
}
