//! Registry credentials from the Docker client config
//!
//! Reads the `auths` table of `~/.docker/config.json` (or a configured path)
//! and returns the base64 `auth` token stored for a registry hostname.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{PruneError, Result};

/// A pre-encoded HTTP Basic credential
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth(String);

impl BasicAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BasicAuth(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct DockerConfigFile {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
}

#[derive(Debug, Deserialize)]
struct AuthEntry {
    auth: Option<String>,
}

/// Find the credential for `hostname` in a Docker config file.
///
/// The `https://{hostname}` entry wins over a bare `{hostname}` entry.
pub fn lookup_basic_auth(docker_config: &Path, hostname: &str) -> Result<BasicAuth> {
    let content = std::fs::read_to_string(docker_config).map_err(|e| {
        PruneError::Config(format!(
            "Failed to read Docker config {}: {}",
            docker_config.display(),
            e
        ))
    })?;
    let parsed: DockerConfigFile = serde_json::from_str(&content).map_err(|e| {
        PruneError::Config(format!(
            "Failed to parse Docker config {}: {}",
            docker_config.display(),
            e
        ))
    })?;

    [format!("https://{hostname}"), hostname.to_string()]
        .iter()
        .find_map(|key| {
            parsed
                .auths
                .get(key)
                .and_then(|entry| entry.auth.clone())
                .filter(|auth| !auth.is_empty())
        })
        .map(BasicAuth::new)
        .ok_or_else(|| {
            PruneError::Config(format!(
                "Cannot find credentials for {} in {}",
                hostname,
                docker_config.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(body: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_prefers_https_entry() {
        let (_dir, path) = write_config(
            r#"{"auths": {
                "dtr.example.com": {"auth": "YmFyZTpob3N0"},
                "https://dtr.example.com": {"auth": "aHR0cHM6aG9zdA=="}
            }}"#,
        );

        let auth = lookup_basic_auth(&path, "dtr.example.com").unwrap();
        assert_eq!(auth.header_value(), "Basic aHR0cHM6aG9zdA==");
    }

    #[test]
    fn test_falls_back_to_bare_hostname() {
        let (_dir, path) = write_config(r#"{"auths": {"dtr.example.com": {"auth": "dXNlcjpwdw=="}}}"#);

        let auth = lookup_basic_auth(&path, "dtr.example.com").unwrap();
        assert_eq!(auth, BasicAuth::new("dXNlcjpwdw=="));
    }

    #[test]
    fn test_empty_https_token_falls_back_to_bare_hostname() {
        let (_dir, path) = write_config(
            r#"{"auths": {
                "https://dtr.example.com": {"auth": ""},
                "dtr.example.com": {"auth": "dXNlcjpwdw=="}
            }}"#,
        );

        let auth = lookup_basic_auth(&path, "dtr.example.com").unwrap();
        assert_eq!(auth, BasicAuth::new("dXNlcjpwdw=="));
    }

    #[test]
    fn test_only_empty_tokens_is_config_error() {
        let (_dir, path) = write_config(r#"{"auths": {"dtr.example.com": {"auth": ""}}}"#);

        let err = lookup_basic_auth(&path, "dtr.example.com").unwrap_err();
        assert!(matches!(err, PruneError::Config(_)));
    }

    #[test]
    fn test_missing_entry_is_config_error() {
        let (_dir, path) = write_config(r#"{"auths": {"other.example.com": {"auth": "eDp5"}}}"#);

        let err = lookup_basic_auth(&path, "dtr.example.com").unwrap_err();
        assert!(matches!(err, PruneError::Config(_)));
        assert!(err.to_string().contains("dtr.example.com"));
    }

    #[test]
    fn test_entry_without_auth_field_is_config_error() {
        let (_dir, path) =
            write_config(r#"{"auths": {"https://dtr.example.com": {"identitytoken": "t"}}}"#);

        assert!(lookup_basic_auth(&path, "dtr.example.com").is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = lookup_basic_auth(&dir.path().join("nope.json"), "dtr.example.com").unwrap_err();
        assert!(matches!(err, PruneError::Config(_)));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let (_dir, path) = write_config("not json");
        let err = lookup_basic_auth(&path, "dtr.example.com").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let auth = BasicAuth::new("c2VjcmV0");
        assert!(!format!("{auth:?}").contains("c2VjcmV0"));
    }
}
