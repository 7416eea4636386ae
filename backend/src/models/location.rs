use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location identifier (UUID v4 string, never reused).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocId(pub String);

impl LocId {
    pub fn new(value: impl Into<String>) -> Self {
        LocId(value.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        LocId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LocId {
    fn from(v: &str) -> Self {
        LocId(v.to_string())
    }
}

impl From<String> for LocId {
    fn from(v: String) -> Self {
        LocId(v)
    }
}

/// Plain coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Coordinates plus the human readable address resolved by the map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: String,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
        }
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// A bookmarked location as owned by the storage layer.
///
/// Ratings are nominally 1-5 but nothing downstream relies on that: the
/// query pipeline and the histograms accept any integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: LocId,
    pub name: String,
    #[serde(alias = "rate")]
    pub rating: i32,
    pub geo: GeoPoint,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl LocationRecord {
    /// True once the record has been saved again after creation.
    pub fn was_updated(&self) -> bool {
        self.created_at != self.updated_at
    }
}

/// Unsaved input to `LocationRepository::save`.
///
/// Without an `id` the draft creates a new record and `geo` is required.
/// With an `id` it updates name and rating (and geo when present).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LocId>,
    pub name: String,
    #[serde(alias = "rate")]
    pub rating: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
}

impl LocationDraft {
    pub fn create(name: impl Into<String>, rating: i32, geo: GeoPoint) -> Self {
        Self {
            id: None,
            name: name.into(),
            rating,
            geo: Some(geo),
        }
    }

    pub fn update(id: LocId, name: impl Into<String>, rating: i32) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            rating,
            geo: None,
        }
    }
}
