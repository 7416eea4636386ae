//! Service layer: the query/aggregation core plus repository orchestration.
//!
//! Everything except [`locations`] is synchronous and pure. `locations`
//! awaits the repository for a snapshot and hands it to the other modules.

pub mod geo;
pub mod histogram;
pub mod locations;
pub mod query;
pub mod query_state;
pub mod segments;

pub use geo::{distance_km, round_distance};
pub use histogram::{aggregate_by_rating, aggregate_by_recency, AgeBand, BucketMap, RecencyBands};
pub use locations::{LocationView, StatsSettings, ViewOptions};
pub use query::{query, FilterCriteria, SortCriteria, SortDirection, SortField};
pub use query_state::{FilterPatch, QueryState, SharedQueryState};
pub use segments::{encode, legend, ColorStop, ColorStops, LegendEntry, Palette, RoundingMode, SegmentChart};
