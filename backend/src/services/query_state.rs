//! Filter/sort configuration for the location list.
//!
//! `QueryState` is a plain value owned by whoever drives the UI (the HTTP
//! shell keeps one in `AppState`). The pipeline never reads it implicitly:
//! callers take a snapshot and pass the criteria to
//! [`query`](crate::services::query::query).

use std::sync::Arc;

use log::warn;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::query::{coerce_min_rating_value, FilterCriteria, SortCriteria, SortField};

/// Partial filter update. Absent fields keep their current value.
///
/// `minRate` accepts any JSON value and is coerced, so a form posting
/// `"abc"` or `null` resets the threshold to `0` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txt: Option<String>,
    #[serde(
        default,
        rename = "minRate",
        alias = "minRating",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_rate: Option<serde_json::Value>,
}

impl FilterPatch {
    pub fn txt(txt: impl Into<String>) -> Self {
        Self {
            txt: Some(txt.into()),
            min_rate: None,
        }
    }

    pub fn min_rate(value: impl Into<serde_json::Value>) -> Self {
        Self {
            txt: None,
            min_rate: Some(value.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.txt.is_none() && self.min_rate.is_none()
    }

    /// Merge this patch over `base`, coercing the threshold.
    pub fn apply_to(&self, base: &FilterCriteria) -> FilterCriteria {
        let min_rating = match &self.min_rate {
            Some(raw) => {
                let coerced = coerce_min_rating_value(raw);
                let numeric = match raw {
                    serde_json::Value::Number(_) => true,
                    serde_json::Value::String(s) => s.trim().parse::<f64>().is_ok(),
                    _ => false,
                };
                if !numeric {
                    warn!("minRate {} is not numeric, using {}", raw, coerced);
                }
                coerced
            }
            None => base.min_rating,
        };
        FilterCriteria {
            txt: self.txt.clone().unwrap_or_else(|| base.txt.clone()),
            min_rating,
        }
    }
}

/// Current filter and sort. Starts as the identity filter with no sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub filter: FilterCriteria,
    #[serde(default)]
    pub sort: Option<SortCriteria>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> Option<&SortCriteria> {
        self.sort.as_ref()
    }

    /// Merge `patch` into the current filter and return the new full filter.
    pub fn set_filter(&mut self, patch: &FilterPatch) -> FilterCriteria {
        self.filter = patch.apply_to(&self.filter);
        self.filter.clone()
    }

    /// Replace the active sort. Only one field is sorted on at a time.
    pub fn set_sort(&mut self, field: SortField, desc: bool) -> SortCriteria {
        let sort = SortCriteria::new(field, desc);
        self.sort = Some(sort);
        sort
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }
}

/// Cloneable handle over a [`QueryState`] for multi-task hosts.
///
/// Every method takes the lock once and releases it before returning, so a
/// read-modify-write never spans an await point.
#[derive(Debug, Clone, Default)]
pub struct SharedQueryState {
    inner: Arc<RwLock<QueryState>>,
}

impl SharedQueryState {
    pub fn new(state: QueryState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> QueryState {
        self.inner.read().clone()
    }

    pub fn set_filter(&self, patch: &FilterPatch) -> FilterCriteria {
        self.inner.write().set_filter(patch)
    }

    pub fn set_sort(&self, field: SortField, desc: bool) -> SortCriteria {
        self.inner.write().set_sort(field, desc)
    }

    pub fn clear_sort(&self) {
        self.inner.write().clear_sort();
    }
}
