//! Filter and sort pipeline for the location list.
//!
//! The pipeline is a pure function over a record snapshot: it never mutates
//! its input and never touches the query state holder. Filtering keeps the
//! relative order of surviving records and sorting is stable, so records
//! with equal keys come out in insertion order for either direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::LocationRecord;

/// Active list filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the record name.
    #[serde(default)]
    pub txt: String,
    /// Minimum rating (inclusive). Always normalized to `>= 0`.
    #[serde(default, rename = "minRate", alias = "minRating")]
    pub min_rating: i32,
}

impl FilterCriteria {
    pub fn new(txt: impl Into<String>, min_rating: i32) -> Self {
        Self {
            txt: txt.into(),
            min_rating: min_rating.max(0),
        }
    }

    /// True when the filter lets every record through.
    pub fn is_identity(&self) -> bool {
        self.txt.is_empty() && self.min_rating <= 0
    }

    pub fn matches(&self, record: &LocationRecord) -> bool {
        self.matches_text(&record.name) && record.rating >= self.min_rating
    }

    fn matches_text(&self, name: &str) -> bool {
        self.txt.is_empty() || name.to_lowercase().contains(&self.txt.to_lowercase())
    }
}

/// Error returned when parsing an unknown sort field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort field: {0}")]
pub struct UnknownSortField(pub String);

/// Record fields the list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    #[serde(alias = "rate")]
    Rating,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Rating => "rating",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Ascending comparison of two records on this field.
    ///
    /// Names compare case-insensitively first and fall back to the raw
    /// string so that "paris" and "Paris" still have a fixed order.
    pub fn compare(&self, a: &LocationRecord, b: &LocationRecord) -> Ordering {
        match self {
            SortField::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            SortField::Rating => a.rating.cmp(&b.rating),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(SortField::Name),
            "rate" | "rating" => Ok(SortField::Rating),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            other => Err(UnknownSortField(other.to_string())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction, serialized as the `+1` / `-1` multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn multiplier(&self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl From<SortDirection> for i8 {
    fn from(direction: SortDirection) -> Self {
        direction.multiplier()
    }
}

impl TryFrom<i8> for SortDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortDirection::Ascending),
            -1 => Ok(SortDirection::Descending),
            other => Err(format!("Sort direction must be 1 or -1, got {}", other)),
        }
    }
}

/// A single active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn new(field: SortField, desc: bool) -> Self {
        Self {
            field,
            direction: SortDirection::from_desc(desc),
        }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, false)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, true)
    }

    pub fn compare(&self, a: &LocationRecord, b: &LocationRecord) -> Ordering {
        self.direction.apply(self.field.compare(a, b))
    }
}

/// Run the filter then the (optional) stable sort over `records`.
pub fn query(
    records: &[LocationRecord],
    filter: &FilterCriteria,
    sort: Option<&SortCriteria>,
) -> Vec<LocationRecord> {
    let mut result: Vec<LocationRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    if let Some(sort) = sort {
        // `sort_by` is a stable merge sort; equal keys keep their order.
        result.sort_by(|a, b| sort.compare(a, b));
    }

    debug!(
        "query: {} of {} records matched (txt={:?}, min_rating={}, sort={:?})",
        result.len(),
        records.len(),
        filter.txt,
        filter.min_rating,
        sort.map(|s| (s.field, s.direction.multiplier())),
    );

    result
}

/// Coerce a raw minimum-rating string into a threshold.
///
/// The coercion is total:
/// - surrounding whitespace is ignored;
/// - empty and non-numeric input becomes `0`;
/// - negative values clamp to `0`;
/// - fractions round up (`3.2` keeps ratings `>= 4`, same predicate on integers);
/// - `inf` saturates to `i32::MAX` (matches nothing).
pub fn coerce_min_rating(raw: &str) -> i32 {
    match raw.trim().parse::<f64>() {
        Ok(value) => coerce_number(value),
        Err(_) => 0,
    }
}

/// Coerce a JSON value into a minimum-rating threshold.
///
/// Numbers and numeric strings follow [`coerce_min_rating`]. Booleans count
/// as `1` / `0`, everything else (null, arrays, objects) as `0`.
pub fn coerce_min_rating_value(value: &serde_json::Value) -> i32 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(coerce_number).unwrap_or(0),
        serde_json::Value::String(s) => coerce_min_rating(s),
        serde_json::Value::Bool(b) => i32::from(*b),
        _ => 0,
    }
}

fn coerce_number(value: f64) -> i32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        // Float-to-int casts saturate.
        value.ceil() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, LocId};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn record(id: &str, name: &str, rating: i32, age_hours: i64) -> LocationRecord {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let created = base - Duration::hours(age_hours);
        LocationRecord {
            id: LocId::new(id),
            name: name.to_string(),
            rating,
            geo: GeoPoint::new(0.0, 0.0, ""),
            created_at: created,
            updated_at: created,
        }
    }

    fn names(records: &[LocationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_min_rating_example() {
        let records = vec![record("1", "Paris", 3, 0), record("2", "Lyon", 5, 0)];
        let result = query(&records, &FilterCriteria::new("", 4), None);
        assert_eq!(names(&result), vec!["Lyon"]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let records = vec![
            record("1", "Tel Aviv Port", 3, 0),
            record("2", "Haifa", 4, 0),
            record("3", "Old PORT of Jaffa", 2, 0),
        ];
        let result = query(&records, &FilterCriteria::new("port", 0), None);
        assert_eq!(names(&result), vec!["Tel Aviv Port", "Old PORT of Jaffa"]);
    }

    #[test]
    fn test_unsorted_keeps_insertion_order() {
        let records = vec![
            record("1", "C", 1, 0),
            record("2", "A", 2, 0),
            record("3", "B", 3, 0),
        ];
        let result = query(&records, &FilterCriteria::default(), None);
        assert_eq!(names(&result), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let records = vec![
            record("1", "banana", 1, 0),
            record("2", "Apple", 1, 0),
            record("3", "cherry", 1, 0),
        ];
        let sort = SortCriteria::ascending(SortField::Name);
        let result = query(&records, &FilterCriteria::default(), Some(&sort));
        assert_eq!(names(&result), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_by_rating_descending_is_stable() {
        let records = vec![
            record("1", "a", 3, 0),
            record("2", "b", 5, 0),
            record("3", "c", 3, 0),
            record("4", "d", 5, 0),
        ];
        let sort = SortCriteria::descending(SortField::Rating);
        let result = query(&records, &FilterCriteria::default(), Some(&sort));
        assert_eq!(names(&result), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_by_timestamps() {
        let records = vec![
            record("1", "newest", 1, 1),
            record("2", "oldest", 1, 30),
            record("3", "middle", 1, 10),
        ];
        let sort = SortCriteria::ascending(SortField::CreatedAt);
        let result = query(&records, &FilterCriteria::default(), Some(&sort));
        assert_eq!(names(&result), vec!["oldest", "middle", "newest"]);

        let sort = SortCriteria::descending(SortField::UpdatedAt);
        let result = query(&records, &FilterCriteria::default(), Some(&sort));
        assert_eq!(names(&result), vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_query_does_not_mutate_input() {
        let records = vec![record("1", "b", 1, 0), record("2", "a", 2, 0)];
        let before = records.clone();
        let sort = SortCriteria::ascending(SortField::Name);
        let _ = query(&records, &FilterCriteria::new("", 2), Some(&sort));
        assert_eq!(records, before);
    }

    #[test]
    fn test_empty_input() {
        let result = query(&[], &FilterCriteria::new("x", 3), None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!("rate".parse::<SortField>().unwrap(), SortField::Rating);
        assert_eq!("rating".parse::<SortField>().unwrap(), SortField::Rating);
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!("updated_at".parse::<SortField>().unwrap(), SortField::UpdatedAt);
        assert_eq!(
            "distance".parse::<SortField>(),
            Err(UnknownSortField("distance".to_string()))
        );
    }

    #[test]
    fn test_sort_criteria_serializes_direction_as_multiplier() {
        let sort = SortCriteria::descending(SortField::Rating);
        let json = serde_json::to_value(sort).unwrap();
        assert_eq!(json, json!({"field": "rating", "direction": -1}));

        let parsed: SortCriteria =
            serde_json::from_value(json!({"field": "rate", "direction": 1})).unwrap();
        assert_eq!(parsed, SortCriteria::ascending(SortField::Rating));

        let bad: Result<SortCriteria, _> =
            serde_json::from_value(json!({"field": "name", "direction": 0}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_filter_serializes_with_original_keys() {
        let json = serde_json::to_value(FilterCriteria::new("abc", 3)).unwrap();
        assert_eq!(json, json!({"txt": "abc", "minRate": 3}));
    }

    #[test]
    fn test_coerce_min_rating_boundaries() {
        assert_eq!(coerce_min_rating("0"), 0);
        assert_eq!(coerce_min_rating("4"), 4);
        assert_eq!(coerce_min_rating(" 3 "), 3);
        assert_eq!(coerce_min_rating("-2"), 0);
        assert_eq!(coerce_min_rating("3.2"), 4);
        assert_eq!(coerce_min_rating(""), 0);
        assert_eq!(coerce_min_rating("abc"), 0);
        assert_eq!(coerce_min_rating("NaN"), 0);
        assert_eq!(coerce_min_rating("-inf"), 0);
        assert_eq!(coerce_min_rating("inf"), i32::MAX);
    }

    #[test]
    fn test_coerce_min_rating_value() {
        assert_eq!(coerce_min_rating_value(&json!(5)), 5);
        assert_eq!(coerce_min_rating_value(&json!(2.5)), 3);
        assert_eq!(coerce_min_rating_value(&json!(-1)), 0);
        assert_eq!(coerce_min_rating_value(&json!("4")), 4);
        assert_eq!(coerce_min_rating_value(&json!("four")), 0);
        assert_eq!(coerce_min_rating_value(&json!(true)), 1);
        assert_eq!(coerce_min_rating_value(&json!(false)), 0);
        assert_eq!(coerce_min_rating_value(&json!(null)), 0);
        assert_eq!(coerce_min_rating_value(&json!([3])), 0);
    }

    #[test]
    fn test_non_numeric_threshold_behaves_as_identity() {
        let records = vec![record("1", "a", 1, 0), record("2", "b", 5, 0)];
        let filter = FilterCriteria::new("", coerce_min_rating("not a number"));
        assert!(filter.is_identity());
        assert_eq!(query(&records, &filter, None), records);
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod query_tests;
