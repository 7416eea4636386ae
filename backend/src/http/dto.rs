//! Data Transfer Objects for the HTTP API.
//!
//! Core types (`LocationRecord`, `LocationView`, `SegmentChart`,
//! `QueryState`) already derive Serialize/Deserialize and are re-exported
//! as-is.

use serde::{Deserialize, Serialize};

pub use crate::models::{LocationDraft, LocationRecord};
pub use crate::services::locations::LocationView;
pub use crate::services::query::{FilterCriteria, SortCriteria};
pub use crate::services::query_state::{FilterPatch, QueryState};
pub use crate::services::segments::SegmentChart;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Repository status ("connected", "disconnected" or "error: ...")
    pub database: String,
}

/// Query parameters of `GET /v1/locs`.
///
/// `txt` and `minRate` override the stored filter for this request only.
/// `lat`/`lng` is the user position used for distances; both are needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub txt: Option<String>,
    #[serde(default, alias = "minRating")]
    pub min_rate: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub loc_id: Option<String>,
}

/// Response of `GET /v1/locs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationListResponse {
    pub locations: Vec<LocationView>,
    pub total: usize,
    /// Filter that produced this list
    pub filter: FilterCriteria,
    pub sort: Option<SortCriteria>,
}

/// Body of `PUT /v1/query/sort`.
///
/// A missing or blank `field` leaves the current sort untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub desc: bool,
}
