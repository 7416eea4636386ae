//! # Travel Tip backend
//!
//! Query and aggregation core of a location bookmarking tool, plus the
//! storage and HTTP plumbing around it.
//!
//! ## Features
//!
//! - **Query pipeline**: text and minimum-rating filter followed by a stable
//!   single-field sort
//! - **Histograms**: rating and recency buckets with a mandatory total
//! - **Chart encoding**: proportional conic-gradient color stops and legend
//! - **Distances**: haversine great-circle distance to the user position
//! - **HTTP API**: RESTful endpoints for a map front end
//!
//! ## Architecture
//!
//! - [`models`]: location records, drafts and "time ago" formatting
//! - [`services`]: the pure pipeline plus repository orchestration
//! - [`db`]: repository trait, in-memory and JSON file stores
//! - [`config`]: `travel-tip.toml` loading with environment overrides
//! - [`http`]: axum router and handlers (feature `http-server`)

#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
