//! Demo locations for a fresh store.

use log::info;

use super::repository::{LocationRepository, RepositoryResult};
use crate::models::{GeoPoint, LocationDraft};

/// A handful of places spread over every rating tier.
pub fn demo_drafts() -> Vec<LocationDraft> {
    vec![
        LocationDraft::create("Ben Gurion Airport", 2, GeoPoint::new(32.0004465, 34.8706095, "Airport, Lod")),
        LocationDraft::create("Dekel Beach", 4, GeoPoint::new(29.5393848, 34.9457792, "Eilat")),
        LocationDraft::create("Dahab, Egypt", 5, GeoPoint::new(28.5096676, 34.5165187, "Dahab, South Sinai")),
        LocationDraft::create("Old Jaffa Port", 3, GeoPoint::new(32.0543, 34.7516, "Jaffa, Tel Aviv-Yafo")),
        LocationDraft::create("Mount Hermon", 4, GeoPoint::new(33.4164, 35.8572, "Golan Heights")),
        LocationDraft::create("Parking lot", 1, GeoPoint::new(32.0853, 34.7818, "Tel Aviv")),
    ]
}

/// Save the demo drafts when `repo` holds no records. Returns how many were
/// added.
pub async fn seed_if_empty<R: LocationRepository + ?Sized>(repo: &R) -> RepositoryResult<usize> {
    if !repo.list_all().await?.is_empty() {
        return Ok(0);
    }
    let drafts = demo_drafts();
    let count = drafts.len();
    for draft in drafts {
        repo.save(draft).await?;
    }
    info!("Seeded {} demo locations", count);
    Ok(count)
}
