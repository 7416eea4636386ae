//! Repository trait for location storage.
//!
//! Implementations are swapped via [`RepositoryFactory`](super::RepositoryFactory):
//! the in-memory [`LocalRepository`](super::LocalRepository) and the JSON-backed
//! [`FileRepository`](super::FileRepository).

use async_trait::async_trait;

use crate::models::{LocId, LocationDraft, LocationRecord};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Storage collaborator for location records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every request handler.
///
/// # Errors
/// Missing records are always reported as [`RepositoryError::NotFound`],
/// never as a default record.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Check that the backing store is usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Every stored record in insertion order.
    async fn list_all(&self) -> RepositoryResult<Vec<LocationRecord>>;

    async fn get_by_id(&self, id: &LocId) -> RepositoryResult<LocationRecord>;

    /// Create or update a record.
    ///
    /// Without `draft.id` a new record is created with a fresh id and
    /// `created_at == updated_at == now`; `draft.geo` is required. With an id
    /// the existing record's name and rating (and geo when present) are
    /// replaced and `updated_at` is refreshed.
    async fn save(&self, draft: LocationDraft) -> RepositoryResult<LocationRecord>;

    async fn remove(&self, id: &LocId) -> RepositoryResult<()>;
}
