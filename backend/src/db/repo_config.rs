//! `[repository]` settings of `travel-tip.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Default file for the `file` repository.
pub const DEFAULT_REPOSITORY_PATH: &str = "locations.json";

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// JSON file used by the `file` repository
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Seed demo locations into an empty store on startup
    #[serde(default)]
    pub seed_demo: bool,
}

fn default_repo_type() -> String {
    "local".to_string()
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            path: None,
            seed_demo: false,
        }
    }
}

impl RepositorySettings {
    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repo_type).map_err(RepositoryError::configuration)
    }

    /// File path for the `file` repository, falling back to
    /// [`DEFAULT_REPOSITORY_PATH`].
    pub fn file_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOSITORY_PATH))
    }
}
