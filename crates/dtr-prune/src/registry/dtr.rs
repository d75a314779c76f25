//! Docker Trusted Registry client
//!
//! Implements [`Registry`] over the DTR `api/v0` endpoints with reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use urlencoding::encode;

use crate::config::RegistryConfig;
use crate::error::{PruneError, Result};
use crate::registry::Registry;
use crate::registry::credentials::{BasicAuth, lookup_basic_auth};

/// Upper bound on repositories fetched in the single bulk listing
const REPOSITORY_LIMIT: u32 = 9999;

/// HTTP client for one DTR host
#[derive(Debug)]
pub struct DtrClient {
    client: Client,
    base_url: String,
    hostname: String,
    auth: BasicAuth,
}

/// Body of the repository listing
#[derive(Debug, Deserialize)]
struct RepositoriesResponse {
    #[serde(default)]
    repositories: Vec<NamedEntry>,
}

/// Body of the tag listing
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Vec<NamedEntry>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: String,
}

impl DtrClient {
    /// Create a client with explicit credentials
    pub fn new(config: &RegistryConfig, auth: BasicAuth) -> Result<Self> {
        url::Url::parse(&config.base_url()).map_err(|e| {
            PruneError::Config(format!("Invalid registry URL {}: {}", config.base_url(), e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PruneError::Config(format!("Failed to build HTTP client: {e}")))?;

        info!("DtrClient initialized for {}", config.base_url());

        Ok(Self {
            client,
            base_url: config.base_url(),
            hostname: config.hostname.clone(),
            auth,
        })
    }

    /// Create a client using the credentials stored in the Docker config
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let auth = lookup_basic_auth(&config.docker_config, &config.hostname)?;
        Self::new(config, auth)
    }

    fn repositories_url(&self, namespace: &str) -> String {
        format!(
            "{}/api/v0/repositories/{}",
            self.base_url,
            encode(namespace)
        )
    }

    fn tags_url(&self, namespace: &str, repository: &str) -> String {
        format!(
            "{}/api/v0/repositories/{}/{}/tags",
            self.base_url,
            encode(namespace),
            encode(repository)
        )
    }

    fn manifest_url(&self, namespace: &str, repository: &str, tag: &str) -> String {
        format!(
            "{}/api/v0/repositories/{}/{}/manifests/{}",
            self.base_url,
            encode(namespace),
            encode(repository),
            encode(tag)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth.header_value())
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PruneError::Transport(format!(
                "GET {url} returned {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Registry for DtrClient {
    async fn list_repositories(&self, namespace: &str) -> Result<Vec<String>> {
        let url = self.repositories_url(namespace);
        info!("Determining repos in {}", url);

        let body: RepositoriesResponse = self
            .get_json(
                &url,
                &[
                    ("start", "0".to_string()),
                    ("limit", REPOSITORY_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(body.repositories.into_iter().map(|r| r.name).collect())
    }

    async fn list_tags(&self, namespace: &str, repository: &str) -> Result<Vec<String>> {
        let url = self.tags_url(namespace, repository);
        let body: TagsResponse = self.get_json(&url, &[]).await?;
        Ok(body.tags.into_iter().map(|t| t.name).collect())
    }

    async fn delete_tag(&self, namespace: &str, repository: &str, tag: &str) -> bool {
        let url = self.manifest_url(namespace, repository, tag);
        debug!("DELETE {}", url);

        match self
            .client
            .delete(&url)
            .header("Authorization", self.auth.header_value())
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::ACCEPTED => true,
            Ok(response) => {
                warn!(
                    "Delete of {}/{}:{} returned {}",
                    namespace,
                    repository,
                    tag,
                    response.status()
                );
                false
            }
            Err(e) => {
                warn!("Delete of {}/{}:{} failed: {}", namespace, repository, tag, e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        &self.hostname
    }
}
