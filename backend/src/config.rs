//! Application configuration (`travel-tip.toml` plus environment overrides).
//!
//! Search order for the file:
//! 1. `$TRAVEL_TIP_CONFIG`
//! 2. `./travel-tip.toml`
//! 3. `backend/travel-tip.toml`
//!
//! Without a file every section falls back to its defaults. `HOST`, `PORT`,
//! `REPOSITORY_TYPE` and `REPOSITORY_PATH` override the file.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::db::RepositorySettings;
use crate::services::histogram::{AgeBand, RecencyBands};
use crate::services::locations::StatsSettings;
use crate::services::segments::{Palette, RoundingMode, DEFAULT_COLORS, DEFAULT_EMPTY_COLOR};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TRAVEL_TIP_CONFIG";

const DEFAULT_SEARCH_PATHS: [&str; 2] = ["travel-tip.toml", "backend/travel-tip.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Raw `[stats]` table. Turned into [`StatsSettings`] after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    #[serde(default = "default_empty_color")]
    pub empty_color: String,
    #[serde(default)]
    pub rounding: RoundingMode,
    /// Empty means the built-in today/week/month bands.
    #[serde(default)]
    pub recency_bands: Vec<AgeBand>,
    #[serde(default = "default_overflow_label")]
    pub overflow_label: String,
}

fn default_palette() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

fn default_empty_color() -> String {
    DEFAULT_EMPTY_COLOR.to_string()
}

fn default_overflow_label() -> String {
    "older".to_string()
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            empty_color: default_empty_color(),
            rounding: RoundingMode::default(),
            recency_bands: Vec::new(),
            overflow_label: default_overflow_label(),
        }
    }
}

impl StatsConfig {
    pub fn to_settings(&self) -> Result<StatsSettings> {
        let palette = Palette::new(self.palette.iter().cloned(), self.empty_color.clone())
            .context("Invalid [stats] palette")?;
        let recency_bands = if self.recency_bands.is_empty() {
            RecencyBands::default()
        } else {
            RecencyBands::new(self.recency_bands.clone(), self.overflow_label.clone())
                .context("Invalid [[stats.recency_bands]]")?
        };
        Ok(StatsSettings {
            palette,
            rounding: self.rounding,
            recency_bands,
        })
    }
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Locate and parse the config file, then apply environment overrides
    /// and validate.
    pub fn load() -> Result<Self> {
        let mut config = match Self::locate()? {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn locate() -> Result<Option<PathBuf>> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(anyhow!(
                    "{} points at missing file {}",
                    CONFIG_ENV_VAR,
                    path.display()
                ));
            }
            return Ok(Some(path));
        }
        Ok(DEFAULT_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists()))
    }

    /// Apply `HOST`, `PORT`, `REPOSITORY_TYPE` and `REPOSITORY_PATH` from
    /// `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", port))?;
        }
        if let Some(repo_type) = lookup("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Some(path) = lookup("REPOSITORY_PATH") {
            if path.trim().is_empty() {
                warn!("Ignoring empty REPOSITORY_PATH");
            } else {
                self.repository.path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.repository
            .repository_type()
            .context("Invalid [repository] section")?;
        self.stats.to_settings()?;
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid bind address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }

    pub fn stats_settings(&self) -> Result<StatsSettings> {
        self.stats.to_settings()
    }
}
