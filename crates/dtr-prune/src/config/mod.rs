use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PruneError, Result};

/// Main configuration structure for dtr-prune
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Registry endpoint and credential configuration
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Tag expiration and minimum-retention policy
    #[serde(default)]
    pub retention: RetentionPolicy,
}

/// Registry endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Registry hostname, also the key used to find credentials
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Base URL override (defaults to `https://{hostname}`)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Docker client config holding the `auths` table
    #[serde(default = "default_docker_config")]
    pub docker_config: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            docker_config: default_docker_config(),
        }
    }
}

impl RegistryConfig {
    /// Base URL requests are issued against, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.hostname),
        }
    }
}

fn default_hostname() -> String {
    "dtr.cucloud.net".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_docker_config() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".docker").join("config.json"))
        .unwrap_or_else(|| PathBuf::from(".docker/config.json"))
}

/// Expiration and retention policy applied to each repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetentionPolicy {
    /// Days after the tag timestamp before a tag counts as expired
    #[serde(default = "default_expiration_age_days")]
    pub expiration_age_days: u32,
    /// chrono format of the timestamp part of a tag
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
    /// Timestamped tags that always remain in a repository
    #[serde(default = "default_minimum_images_to_keep")]
    pub minimum_images_to_keep: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            expiration_age_days: default_expiration_age_days(),
            datetime_format: default_datetime_format(),
            minimum_images_to_keep: default_minimum_images_to_keep(),
        }
    }
}

impl RetentionPolicy {
    pub fn with_expiration_age_days(mut self, days: u32) -> Self {
        self.expiration_age_days = days;
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }
}

fn default_expiration_age_days() -> u32 {
    90
}

fn default_datetime_format() -> String {
    "%m%d%Y-%H%M%S".to_string()
}

fn default_minimum_images_to_keep() -> usize {
    3
}

impl Config {
    /// Parse a config from TOML text and validate it
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| PruneError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PruneError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Load from an explicit path, or the first default location that exists,
    /// or fall back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        let default_paths = [
            dirs::home_dir().map(|h| h.join(".dtr-prune").join("config.toml")),
            dirs::config_dir().map(|c| c.join("dtr-prune").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retention.expiration_age_days == 0 {
            return Err(PruneError::Config(
                "retention.expiration_age_days must be a positive number of days".to_string(),
            ));
        }
        if self.retention.datetime_format.is_empty() {
            return Err(PruneError::Config(
                "retention.datetime_format must not be empty".to_string(),
            ));
        }
        if self.registry.hostname.is_empty() {
            return Err(PruneError::Config(
                "registry.hostname must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.registry.hostname, "dtr.cucloud.net");
        assert!(config.registry.base_url.is_none());
        assert_eq!(config.registry.timeout_secs, 30);
        assert!(config.registry.docker_config.ends_with(".docker/config.json"));
        assert_eq!(config.retention.expiration_age_days, 90);
        assert_eq!(config.retention.datetime_format, "%m%d%Y-%H%M%S");
        assert_eq!(config.retention.minimum_images_to_keep, 3);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[registry]
hostname = "registry.example.com"
base_url = "http://127.0.0.1:8080/"
timeout_secs = 5
docker_config = "/tmp/docker/config.json"

[retention]
expiration_age_days = 30
datetime_format = "%Y%m%d"
minimum_images_to_keep = 5
"#;

        let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

        assert_eq!(config.registry.hostname, "registry.example.com");
        assert_eq!(config.registry.base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.registry.timeout_secs, 5);
        assert_eq!(
            config.registry.docker_config,
            PathBuf::from("/tmp/docker/config.json")
        );
        assert_eq!(config.retention.expiration_age_days, 30);
        assert_eq!(config.retention.datetime_format, "%Y%m%d");
        assert_eq!(config.retention.minimum_images_to_keep, 5);
    }

    #[test]
    fn test_toml_partial_deserialization() {
        let toml_str = r#"
[retention]
expiration_age_days = 14
"#;

        let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

        assert_eq!(config.retention.expiration_age_days, 14);
        assert_eq!(config.retention.datetime_format, "%m%d%Y-%H%M%S");
        assert_eq!(config.retention.minimum_images_to_keep, 3);
        assert_eq!(config.registry.hostname, "dtr.cucloud.net");
    }

    #[test]
    fn test_base_url_derived_from_hostname() {
        let registry = RegistryConfig {
            hostname: "dtr.internal".to_string(),
            ..RegistryConfig::default()
        };
        assert_eq!(registry.base_url(), "https://dtr.internal");
    }

    #[test]
    fn test_zero_expiration_rejected() {
        let toml_str = r#"
[retention]
expiration_age_days = 0
"#;

        let err = Config::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, PruneError::Config(_)));
        assert!(err.to_string().contains("expiration_age_days"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml("[retention\nexpiration_age_days = ").unwrap_err();
        assert!(matches!(err, PruneError::Config(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[registry]\nhostname = \"dtr.test\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.registry.hostname, "dtr.test");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_policy_builders() {
        let policy = RetentionPolicy::default()
            .with_expiration_age_days(7)
            .with_datetime_format("%Y%m%d");
        assert_eq!(policy.expiration_age_days, 7);
        assert_eq!(policy.datetime_format, "%Y%m%d");
        assert_eq!(policy.minimum_images_to_keep, 3);
    }
}
