//! Storage layer for location records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP shell (http/)                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services::locations)                     │
//! │  - Draft validation                                      │
//! │  - Query pipeline, histograms, chart encoding            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌──────────▼──────────────┐
//! │ Local Repository │     │ File Repository         │
//! │ (in-memory)      │     │ (JSON document)         │
//! └──────────────────┘     └─────────────────────────┘
//! ```

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod seed;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositorySettings;
pub use repositories::{FileRepository, LocalRepository};
pub use repository::{
    ErrorContext, LocationRepository, RepositoryError, RepositoryResult,
};
pub use seed::{demo_drafts, seed_if_empty};
