//! Repository-agnostic location operations.
//!
//! Every function here awaits the repository once for a snapshot and then
//! runs the synchronous pipeline (query, histograms, encoder) over it. The
//! functions are generic over [`LocationRepository`] so they accept both
//! concrete repositories and `Arc<dyn LocationRepository>` via `as_ref()`.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::db::repository::{ErrorContext, LocationRepository, RepositoryError, RepositoryResult};
use crate::models::{elapsed_since, LatLng, LocId, LocationDraft, LocationRecord};

use super::geo::{distance_km, round_distance};
use super::histogram::{aggregate_by_rating, aggregate_by_recency, RecencyBands};
use super::query::{query, FilterCriteria, SortCriteria};
use super::query_state::QueryState;
use super::segments::{Palette, RoundingMode, SegmentChart};

/// Lowest accepted rating for a saved location.
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating for a saved location.
pub const MAX_RATING: i32 = 5;

/// A record with the extras the list renders next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    #[serde(flatten)]
    pub record: LocationRecord,
    /// Distance to the user position in km, 2 decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub created_ago: String,
    /// Present only once the record was saved again after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_ago: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl LocationView {
    pub fn build(record: LocationRecord, options: &ViewOptions) -> Self {
        let distance_km = options
            .user_pos
            .map(|pos| round_distance(distance_km(pos, record.geo.lat_lng())));
        let created_ago = elapsed_since(record.created_at, options.now);
        let updated_ago = record
            .was_updated()
            .then(|| elapsed_since(record.updated_at, options.now));
        let selected = options.selected.as_ref() == Some(&record.id);
        Self {
            record,
            distance_km,
            created_ago,
            updated_ago,
            selected,
        }
    }
}

/// Context for decorating records into [`LocationView`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub user_pos: Option<LatLng>,
    pub selected: Option<LocId>,
    pub now: DateTime<Utc>,
}

impl ViewOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            user_pos: None,
            selected: None,
            now,
        }
    }

    pub fn with_user_pos(mut self, pos: LatLng) -> Self {
        self.user_pos = Some(pos);
        self
    }

    pub fn with_selected(mut self, id: LocId) -> Self {
        self.selected = Some(id);
        self
    }
}

/// Chart settings shared by both histograms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSettings {
    pub palette: Palette,
    pub rounding: RoundingMode,
    pub recency_bands: RecencyBands,
}

pub async fn health_check<R: LocationRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Filtered and sorted records.
pub async fn list_locations<R: LocationRepository + ?Sized>(
    repo: &R,
    filter: &FilterCriteria,
    sort: Option<&SortCriteria>,
) -> RepositoryResult<Vec<LocationRecord>> {
    let records = repo.list_all().await?;
    Ok(query(&records, filter, sort))
}

/// Filtered, sorted and decorated records for the list panel.
pub async fn list_view<R: LocationRepository + ?Sized>(
    repo: &R,
    state: &QueryState,
    options: &ViewOptions,
) -> RepositoryResult<Vec<LocationView>> {
    let records = list_locations(repo, state.filter(), state.sort()).await?;
    Ok(records
        .into_iter()
        .map(|record| LocationView::build(record, options))
        .collect())
}

pub async fn get_location<R: LocationRepository + ?Sized>(
    repo: &R,
    id: &LocId,
) -> RepositoryResult<LocationRecord> {
    repo.get_by_id(id).await
}

/// Validate and save `draft`. Creates when `draft.id` is `None`.
pub async fn save_location<R: LocationRepository + ?Sized>(
    repo: &R,
    draft: LocationDraft,
) -> RepositoryResult<LocationRecord> {
    let draft = validate_draft(draft)?;
    let is_update = draft.id.is_some();
    let record = repo.save(draft).await?;
    if is_update {
        info!("Updated location {} ({})", record.id, record.name);
    } else {
        info!("Created location {} ({})", record.id, record.name);
    }
    Ok(record)
}

pub async fn remove_location<R: LocationRepository + ?Sized>(
    repo: &R,
    id: &LocId,
) -> RepositoryResult<()> {
    repo.remove(id).await?;
    info!("Removed location {}", id);
    Ok(())
}

/// Rating histogram over every stored location, encoded for a pie chart.
pub async fn stats_by_rating<R: LocationRepository + ?Sized>(
    repo: &R,
    settings: &StatsSettings,
) -> RepositoryResult<SegmentChart> {
    let records = repo.list_all().await?;
    let buckets = aggregate_by_rating(&records);
    debug!("rating stats over {} records", buckets.total());
    Ok(SegmentChart::build(buckets, &settings.palette, settings.rounding))
}

/// Recency histogram (by `updatedAt` age at `now`), encoded for a pie chart.
pub async fn stats_by_recency<R: LocationRepository + ?Sized>(
    repo: &R,
    settings: &StatsSettings,
    now: DateTime<Utc>,
) -> RepositoryResult<SegmentChart> {
    let records = repo.list_all().await?;
    let buckets = aggregate_by_recency(&records, now, &settings.recency_bands);
    debug!("recency stats over {} records", buckets.total());
    Ok(SegmentChart::build(buckets, &settings.palette, settings.rounding))
}

/// Check a draft before it reaches storage and normalize its name.
pub fn validate_draft(mut draft: LocationDraft) -> RepositoryResult<LocationDraft> {
    let context = || {
        let ctx = ErrorContext::new("save_location").with_entity("location");
        match &draft_id(&draft) {
            Some(id) => ctx.with_entity_id(id),
            None => ctx,
        }
    };

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Location name must not be empty",
            context(),
        ));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&draft.rating) {
        return Err(RepositoryError::validation_with_context(
            format!(
                "Rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, draft.rating
            ),
            context(),
        ));
    }
    match &draft.geo {
        None if draft.id.is_none() => {
            return Err(RepositoryError::validation_with_context(
                "A new location needs coordinates",
                context(),
            ));
        }
        Some(geo) if !valid_coordinates(geo.lat, geo.lng) => {
            return Err(RepositoryError::validation_with_context(
                format!("Coordinates out of range: ({}, {})", geo.lat, geo.lng),
                context(),
            ));
        }
        _ => {}
    }

    draft.name = name.to_string();
    Ok(draft)
}

fn draft_id(draft: &LocationDraft) -> Option<String> {
    draft.id.as_ref().map(|id| id.to_string())
}

fn valid_coordinates(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}
