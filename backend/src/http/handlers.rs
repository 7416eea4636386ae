//! HTTP handlers for the REST API.
//!
//! Each handler takes what it needs from [`AppState`], snapshots the query
//! state when relevant, and delegates to `services::locations`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use log::warn;

use super::dto::{
    FilterPatch, HealthResponse, ListQuery, LocationDraft, LocationListResponse, LocationRecord,
    QueryState, SegmentChart, SortRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{LatLng, LocId};
use crate::services::locations::{self, ViewOptions};
use crate::services::query::{coerce_min_rating, FilterCriteria, SortField};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match locations::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Locations
// =============================================================================

/// GET /v1/locs
///
/// Filtered, sorted and decorated list using the current query state.
pub async fn list_locations(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> HandlerResult<LocationListResponse> {
    let mut query_state = state.query_state.snapshot();
    if params.txt.is_some() || params.min_rate.is_some() {
        let current = query_state.filter();
        query_state.filter = FilterCriteria::new(
            params.txt.clone().unwrap_or_else(|| current.txt.clone()),
            params
                .min_rate
                .as_deref()
                .map(coerce_min_rating)
                .unwrap_or(current.min_rating),
        );
    }

    let mut options = ViewOptions::at(Utc::now());
    match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => options = options.with_user_pos(LatLng::new(lat, lng)),
        (None, None) => {}
        _ => warn!("Ignoring user position with only one of lat/lng"),
    }
    if let Some(id) = params.loc_id.filter(|id| !id.is_empty()) {
        options = options.with_selected(LocId::new(id));
    }

    let views = locations::list_view(state.repository.as_ref(), &query_state, &options).await?;
    Ok(Json(LocationListResponse {
        total: views.len(),
        locations: views,
        filter: query_state.filter,
        sort: query_state.sort,
    }))
}

/// GET /v1/locs/{id}
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<LocationRecord> {
    let record = locations::get_location(state.repository.as_ref(), &LocId::new(id)).await?;
    Ok(Json(record))
}

/// POST /v1/locs
///
/// Creates a location (201) or updates one when the draft carries an id (200).
pub async fn save_location(
    State(state): State<AppState>,
    body: Result<Json<LocationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<LocationRecord>), AppError> {
    let Json(draft) = body?;
    let status = if draft.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let record = locations::save_location(state.repository.as_ref(), draft).await?;
    Ok((status, Json(record)))
}

/// DELETE /v1/locs/{id}
pub async fn remove_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    locations::remove_location(state.repository.as_ref(), &LocId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Query state
// =============================================================================

/// GET /v1/query
pub async fn get_query_state(State(state): State<AppState>) -> HandlerResult<QueryState> {
    Ok(Json(state.query_state.snapshot()))
}

/// PUT /v1/query/filter
///
/// Merges a partial filter. Returns the full resulting filter.
pub async fn set_filter(
    State(state): State<AppState>,
    body: Result<Json<FilterPatch>, JsonRejection>,
) -> HandlerResult<FilterCriteria> {
    let Json(patch) = body?;
    Ok(Json(state.query_state.set_filter(&patch)))
}

/// PUT /v1/query/sort
pub async fn set_sort(
    State(state): State<AppState>,
    body: Result<Json<SortRequest>, JsonRejection>,
) -> HandlerResult<QueryState> {
    let Json(request) = body?;
    let field = match request.field.as_deref().map(str::trim) {
        Some(field) if !field.is_empty() => field,
        _ => return Ok(Json(state.query_state.snapshot())),
    };
    let field = field
        .parse::<SortField>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    state.query_state.set_sort(field, request.desc);
    Ok(Json(state.query_state.snapshot()))
}

/// DELETE /v1/query/sort
pub async fn clear_sort(State(state): State<AppState>) -> HandlerResult<QueryState> {
    state.query_state.clear_sort();
    Ok(Json(state.query_state.snapshot()))
}

// =============================================================================
// Stats
// =============================================================================

/// GET /v1/stats/rating
pub async fn rating_stats(State(state): State<AppState>) -> HandlerResult<SegmentChart> {
    let chart = locations::stats_by_rating(state.repository.as_ref(), &state.stats).await?;
    Ok(Json(chart))
}

/// GET /v1/stats/recency
pub async fn recency_stats(State(state): State<AppState>) -> HandlerResult<SegmentChart> {
    let chart =
        locations::stats_by_recency(state.repository.as_ref(), &state.stats, Utc::now()).await?;
    Ok(Json(chart))
}
