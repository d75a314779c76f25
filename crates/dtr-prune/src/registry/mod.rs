//! Registry access
//!
//! The [`Registry`] trait is everything the pruner needs from a registry:
//! listing repositories and tags, and deleting a tag. [`DtrClient`] speaks the
//! Docker Trusted Registry v0 API.

pub mod credentials;
pub mod dtr;

pub use credentials::{BasicAuth, lookup_basic_auth};
pub use dtr::DtrClient;

use async_trait::async_trait;

use crate::error::Result;

/// Registry operations consumed by the pruner
#[async_trait]
pub trait Registry: Send + Sync {
    /// Names of all repositories in `namespace`
    async fn list_repositories(&self, namespace: &str) -> Result<Vec<String>>;

    /// Raw tag names of `repository`. An empty list is a valid answer.
    async fn list_tags(&self, namespace: &str, repository: &str) -> Result<Vec<String>>;

    /// Delete a tag. Returns true only if the registry accepted the deletion.
    async fn delete_tag(&self, namespace: &str, repository: &str, tag: &str) -> bool;

    /// Registry name for logging
    fn name(&self) -> &str;
}
