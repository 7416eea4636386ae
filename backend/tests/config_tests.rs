mod support;

use std::path::PathBuf;

use support::with_scoped_env;
use travel_tip::config::{AppConfig, CONFIG_ENV_VAR};
use travel_tip::db::RepositoryType;
use travel_tip::services::RoundingMode;

const ALL_VARS: [&str; 5] = [
    CONFIG_ENV_VAR,
    "HOST",
    "PORT",
    "REPOSITORY_TYPE",
    "REPOSITORY_PATH",
];

fn cleared<'a>(extra: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<_> = ALL_VARS
        .iter()
        .filter(|k| !extra.iter().any(|(e, _)| e == *k))
        .map(|k| (*k, None))
        .collect();
    changes.extend_from_slice(extra);
    changes
}

#[test]
fn test_explicit_config_file_with_env_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("travel-tip.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 9100

[repository]
type = "local"

[stats]
rounding = "largest_remainder"
"#,
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();

    let config = with_scoped_env(
        &cleared(&[
            (CONFIG_ENV_VAR, Some(path_str.as_str())),
            ("REPOSITORY_TYPE", Some("file")),
            ("REPOSITORY_PATH", Some("/tmp/travel-tip-test.json")),
        ]),
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(
        config.repository.repository_type().unwrap(),
        RepositoryType::File
    );
    assert_eq!(
        config.repository.path,
        Some(PathBuf::from("/tmp/travel-tip-test.json"))
    );
    assert_eq!(
        config.stats_settings().unwrap().rounding,
        RoundingMode::LargestRemainder
    );
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = with_scoped_env(
        &cleared(&[(CONFIG_ENV_VAR, Some("/definitely/not/here.toml"))]),
        AppConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_port_env_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();
    let path_str = path.to_string_lossy().to_string();

    let result = with_scoped_env(
        &cleared(&[
            (CONFIG_ENV_VAR, Some(path_str.as_str())),
            ("PORT", Some("eighty")),
        ]),
        AppConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_unknown_repository_type_env_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();
    let path_str = path.to_string_lossy().to_string();

    let result = with_scoped_env(
        &cleared(&[
            (CONFIG_ENV_VAR, Some(path_str.as_str())),
            ("REPOSITORY_TYPE", Some("mongo")),
        ]),
        AppConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_repository_type_alias_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();
    let path_str = path.to_string_lossy().to_string();

    let config = with_scoped_env(
        &cleared(&[
            (CONFIG_ENV_VAR, Some(path_str.as_str())),
            ("REPOSITORY_TYPE", Some("json")),
        ]),
        AppConfig::load,
    )
    .unwrap();
    assert_eq!(
        config.repository.repository_type().unwrap(),
        RepositoryType::File
    );
}

#[test]
fn test_band_bound_beyond_duration_range_is_served() {
    let config = AppConfig::from_toml(
        "[[stats.recency_bands]]\nlabel = \"forever\"\nmax_age_hours = 3000000000000\n",
    )
    .unwrap();
    config.validate().unwrap();

    let bands = config.stats_settings().unwrap().recency_bands;
    assert_eq!(bands.classify(chrono::Duration::hours(1)), "forever");
    assert_eq!(bands.classify(chrono::Duration::weeks(5200)), "forever");
}
