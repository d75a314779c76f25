//! Test utilities for dtr-prune
//!
//! An in-memory [`Registry`] for exercising the pruner without a network.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::error::{PruneError, Result};
use crate::registry::Registry;

/// Tag name `<label>-<timestamp>` stamped `age_days` before `today`, using the
/// default `%m%d%Y-%H%M%S` format.
pub fn tag_aged(label: &str, age_days: u64, today: NaiveDate) -> String {
    let stamped = today
        .checked_sub_days(Days::new(age_days))
        .unwrap_or(NaiveDate::MIN);
    format!("{}-{}-120000", label, stamped.format("%m%d%Y"))
}

/// In-memory registry that records deletions.
#[derive(Debug, Default)]
pub struct MockRegistry {
    repositories: BTreeMap<String, Vec<String>>,
    unlistable: HashSet<String>,
    undeletable: HashSet<String>,
    fail_listing: bool,
    deleted: Mutex<Vec<(String, String)>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository<S: Into<String>>(
        mut self,
        repository: &str,
        tags: impl IntoIterator<Item = S>,
    ) -> Self {
        self.repositories.insert(
            repository.to_string(),
            tags.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Tag listing for `repository` fails with a transport error.
    pub fn with_unlistable(mut self, repository: &str) -> Self {
        self.repositories.entry(repository.to_string()).or_default();
        self.unlistable.insert(repository.to_string());
        self
    }

    /// Deletion of `tag` is refused.
    pub fn with_undeletable(mut self, tag: &str) -> Self {
        self.undeletable.insert(tag.to_string());
        self
    }

    /// Repository listing fails with a transport error.
    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// `(repository, tag)` pairs deleted so far, in call order.
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn list_repositories(&self, _namespace: &str) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(PruneError::Transport("mock listing failure".to_string()));
        }
        Ok(self.repositories.keys().cloned().collect())
    }

    async fn list_tags(&self, _namespace: &str, repository: &str) -> Result<Vec<String>> {
        if self.unlistable.contains(repository) {
            return Err(PruneError::Transport(format!(
                "mock tag listing failure for {repository}"
            )));
        }
        Ok(self.repositories.get(repository).cloned().unwrap_or_default())
    }

    async fn delete_tag(&self, _namespace: &str, repository: &str, tag: &str) -> bool {
        if self.undeletable.contains(tag) {
            return false;
        }
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push((repository.to_string(), tag.to_string()));
        }
        true
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_aged_uses_default_format() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(tag_aged("app", 9, today), "app-03012024-120000");
    }

    #[tokio::test]
    async fn mock_registry_records_deletions() {
        let registry = MockRegistry::new()
            .with_repository("web", ["a-01012024-000000"])
            .with_undeletable("b");

        assert!(registry.delete_tag("ns", "web", "a").await);
        assert!(!registry.delete_tag("ns", "web", "b").await);
        assert_eq!(
            registry.deleted(),
            vec![("web".to_string(), "a".to_string())]
        );
    }

    #[tokio::test]
    async fn mock_registry_listing_failures() {
        let registry = MockRegistry::new()
            .with_unlistable("broken")
            .with_failing_listing();

        assert!(registry.list_repositories("ns").await.is_err());
        assert!(registry.list_tags("ns", "broken").await.is_err());
    }
}
