//! Categorical histograms over location records.
//!
//! Both aggregators partition the record set: every record lands in exactly
//! one bucket, so the bucket counts always sum to `total` and `total` always
//! equals the number of records.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{age, LocationRecord};

/// Key reserved for the sum of all buckets.
pub const TOTAL_KEY: &str = "total";

pub const RATING_LOW: &str = "low";
pub const RATING_MEDIUM: &str = "medium";
pub const RATING_HIGH: &str = "high";

/// Ordered label -> count mapping with a derived `total`.
///
/// Iteration (and serialization) order is insertion order; it drives the
/// segment order of the rendered chart. Zero-count buckets are kept.
/// Serializes as a flat object with `total` last:
/// `{"low": 1, "medium": 0, "high": 2, "total": 3}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketMap {
    buckets: Vec<(String, u64)>,
}

impl BucketMap {
    /// Empty-count map over `labels`, in order. Duplicates are kept once.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_counts(labels.into_iter().map(|label| (label, 0)))
    }

    /// Build from `(label, count)` pairs. A `total` entry is ignored since the
    /// total is always derived; repeated labels accumulate.
    pub fn from_counts<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut map = Self::default();
        for (label, count) in pairs {
            map.add(label, count);
        }
        map
    }

    /// Add `count` to `label`, appending the label if it is new.
    pub fn add(&mut self, label: impl Into<String>, count: u64) {
        let label = label.into();
        if label == TOTAL_KEY {
            return;
        }
        match self.buckets.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing += count,
            None => self.buckets.push((label, count)),
        }
    }

    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        if label == TOTAL_KEY {
            return Some(self.total());
        }
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Buckets with a non-zero count, in map order.
    pub fn active(&self) -> impl Iterator<Item = (&str, u64)> {
        self.iter().filter(|(_, count)| *count > 0)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for BucketMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len() + 1))?;
        for (label, count) in &self.buckets {
            map.serialize_entry(label, count)?;
        }
        map.serialize_entry(TOTAL_KEY, &self.total())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for BucketMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketMapVisitor;

        impl<'de> Visitor<'de> for BucketMapVisitor {
            type Value = BucketMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of bucket counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<BucketMap, A::Error> {
                let mut map = BucketMap::default();
                let mut declared_total = None;
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    if label == TOTAL_KEY {
                        declared_total = Some(count);
                    } else {
                        map.add(label, count);
                    }
                }
                if let Some(total) = declared_total {
                    if total != map.total() {
                        return Err(serde::de::Error::custom(format!(
                            "total {} does not match bucket sum {}",
                            total,
                            map.total()
                        )));
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(BucketMapVisitor)
    }
}

// =============================================================================
// Rating tiers
// =============================================================================

/// Rating tier for a record.
///
/// `low` covers ratings up to 2, `medium` is exactly 3 and `high` is 4 and
/// above. Out-of-range ratings fall into the nearest boundary tier.
pub fn rating_tier(rating: i32) -> &'static str {
    match rating {
        i32::MIN..=2 => RATING_LOW,
        3 => RATING_MEDIUM,
        _ => RATING_HIGH,
    }
}

/// Count records per rating tier (`low`, `medium`, `high`).
pub fn aggregate_by_rating(records: &[LocationRecord]) -> BucketMap {
    let mut map = BucketMap::with_labels([RATING_LOW, RATING_MEDIUM, RATING_HIGH]);
    for record in records {
        map.increment(rating_tier(record.rating));
    }
    map
}

// =============================================================================
// Recency tiers
// =============================================================================

/// Error raised for an unusable set of recency bands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid recency bands: {0}")]
pub struct InvalidBands(pub String);

/// Age band with an exclusive upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    pub label: String,
    pub max_age_hours: u64,
}

impl AgeBand {
    pub fn new(label: impl Into<String>, max_age_hours: u64) -> Self {
        Self {
            label: label.into(),
            max_age_hours,
        }
    }

    /// Bounds past what `Duration` can hold saturate to `Duration::MAX`.
    fn max_age(&self) -> Duration {
        i64::try_from(self.max_age_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX)
    }
}

/// Ordered age bands plus a catch-all label for anything older.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecencyBands {
    bands: Vec<AgeBand>,
    overflow_label: String,
}

impl RecencyBands {
    /// Validate and build a band set.
    ///
    /// Labels must be non-empty, unique and not `total`; upper bounds must be
    /// positive and strictly increasing.
    pub fn new(bands: Vec<AgeBand>, overflow_label: impl Into<String>) -> Result<Self, InvalidBands> {
        let overflow_label = overflow_label.into();
        let mut seen = HashSet::new();
        let mut previous = 0;

        for label in bands.iter().map(|b| &b.label).chain(std::iter::once(&overflow_label)) {
            if label.trim().is_empty() {
                return Err(InvalidBands("labels must not be empty".to_string()));
            }
            if label == TOTAL_KEY {
                return Err(InvalidBands(format!("'{}' is a reserved label", TOTAL_KEY)));
            }
            if !seen.insert(label.as_str()) {
                return Err(InvalidBands(format!("duplicate label '{}'", label)));
            }
        }
        for band in &bands {
            if band.max_age_hours <= previous {
                return Err(InvalidBands(format!(
                    "band '{}' must end after {} hours",
                    band.label, previous
                )));
            }
            previous = band.max_age_hours;
        }

        Ok(Self {
            bands,
            overflow_label,
        })
    }

    pub fn bands(&self) -> &[AgeBand] {
        &self.bands
    }

    pub fn overflow_label(&self) -> &str {
        &self.overflow_label
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .map(|b| b.label.as_str())
            .chain(std::iter::once(self.overflow_label.as_str()))
    }

    /// Band label for an age. Negative ages (future timestamps) land in the
    /// first band.
    pub fn classify(&self, age: Duration) -> &str {
        self.bands
            .iter()
            .find(|band| age < band.max_age())
            .map(|band| band.label.as_str())
            .unwrap_or(&self.overflow_label)
    }
}

impl Default for RecencyBands {
    /// `today` (< 24h), `week` (< 7d), `month` (< 30d), `older`.
    fn default() -> Self {
        Self {
            bands: vec![
                AgeBand::new("today", 24),
                AgeBand::new("week", 24 * 7),
                AgeBand::new("month", 24 * 30),
            ],
            overflow_label: "older".to_string(),
        }
    }
}

/// Count records per recency band of `now - updated_at`.
pub fn aggregate_by_recency(
    records: &[LocationRecord],
    now: DateTime<Utc>,
    bands: &RecencyBands,
) -> BucketMap {
    let mut map = BucketMap::with_labels(bands.labels());
    for record in records {
        map.increment(bands.classify(age(record.updated_at, now)));
    }
    map
}
