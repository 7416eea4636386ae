//! Repository factory for dependency injection.
//!
//! Builds a shared `Arc<dyn LocationRepository>` from runtime settings.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::RepositorySettings;
use super::repositories::{FileRepository, LocalRepository};
use super::repository::{LocationRepository, RepositoryResult};
use super::seed::seed_if_empty;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// JSON file on disk
    File,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "file" | "json" => Ok(Self::File),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```no_run
/// use travel_tip::db::{RepositoryFactory, RepositorySettings};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = RepositorySettings {
///         repo_type: "file".to_string(),
///         path: Some("locations.json".into()),
///         seed_demo: true,
///     };
///     let repo = RepositoryFactory::from_settings(&settings).await?;
///     println!("{} locations", repo.list_all().await?.len());
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    pub fn create_local() -> Arc<dyn LocationRepository> {
        Arc::new(LocalRepository::new())
    }

    pub async fn create_file(path: impl Into<PathBuf>) -> RepositoryResult<Arc<dyn LocationRepository>> {
        Ok(Arc::new(FileRepository::open(path).await?))
    }

    /// Create a repository of `repo_type`; `path` is only used by `File`.
    pub async fn create(
        repo_type: RepositoryType,
        path: Option<PathBuf>,
    ) -> RepositoryResult<Arc<dyn LocationRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::File => {
                let settings = RepositorySettings {
                    path,
                    ..Default::default()
                };
                Self::create_file(settings.file_path()).await
            }
        }
    }

    /// Create the configured repository and seed it when asked to.
    pub async fn from_settings(
        settings: &RepositorySettings,
    ) -> RepositoryResult<Arc<dyn LocationRepository>> {
        let repo_type = settings.repository_type()?;
        let repo = match repo_type {
            RepositoryType::Local => Self::create_local(),
            RepositoryType::File => Self::create_file(settings.file_path()).await?,
        };
        info!("Using {:?} location repository", repo_type);

        if settings.seed_demo {
            seed_if_empty(repo.as_ref()).await?;
        }
        Ok(repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository_type() {
        assert_eq!("local".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        assert_eq!(" FILE ".parse::<RepositoryType>().unwrap(), RepositoryType::File);
        assert!("postgres".parse::<RepositoryType>().is_err());
    }

    #[tokio::test]
    async fn test_from_settings_seeds_local() {
        let settings = RepositorySettings {
            seed_demo: true,
            ..Default::default()
        };
        let repo = RepositoryFactory::from_settings(&settings).await.unwrap();
        assert!(!repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RepositoryFactory::create(RepositoryType::File, Some(dir.path().join("l.json")))
            .await
            .unwrap();
        assert!(repo.health_check().await.unwrap());
    }
}
