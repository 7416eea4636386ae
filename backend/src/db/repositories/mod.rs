//! Repository implementations module.
//!
//! - `local`: in-memory store for tests and local development
//! - `file`: JSON document on disk, rewritten after every mutation

pub mod file;
pub mod local;

pub use file::FileRepository;
pub use local::LocalRepository;

use chrono::{DateTime, Utc};

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{LocId, LocationDraft, LocationRecord};

// Mutations shared by both stores. They work on the plain record list so
// each repository only has to provide locking and persistence.

pub(crate) fn find_record(records: &[LocationRecord], id: &LocId) -> RepositoryResult<LocationRecord> {
    records
        .iter()
        .find(|record| &record.id == id)
        .cloned()
        .ok_or_else(|| missing(id, "get_by_id"))
}

pub(crate) fn apply_draft(
    records: &mut Vec<LocationRecord>,
    draft: LocationDraft,
    now: DateTime<Utc>,
) -> RepositoryResult<LocationRecord> {
    match draft.id {
        Some(id) => {
            let record = records
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or_else(|| missing(&id, "save"))?;
            record.name = draft.name;
            record.rating = draft.rating;
            if let Some(geo) = draft.geo {
                record.geo = geo;
            }
            record.updated_at = now;
            Ok(record.clone())
        }
        None => {
            let geo = draft.geo.ok_or_else(|| {
                RepositoryError::validation_with_context(
                    "A new location needs coordinates",
                    ErrorContext::new("save").with_entity("location"),
                )
            })?;
            let record = LocationRecord {
                id: LocId::generate(),
                name: draft.name,
                rating: draft.rating,
                geo,
                created_at: now,
                updated_at: now,
            };
            records.push(record.clone());
            Ok(record)
        }
    }
}

pub(crate) fn remove_record(records: &mut Vec<LocationRecord>, id: &LocId) -> RepositoryResult<()> {
    let index = records
        .iter()
        .position(|record| &record.id == id)
        .ok_or_else(|| missing(id, "remove"))?;
    records.remove(index);
    Ok(())
}

fn missing(id: &LocId, operation: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Location {} not found", id),
        ErrorContext::new(operation)
            .with_entity("location")
            .with_entity_id(id),
    )
}
