//! Namespace pruning
//!
//! Walks every repository of a namespace, decides which timestamped tags have
//! expired under the retention policy and deletes them (or reports what would
//! be deleted in a dry run).

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::RetentionPolicy;
use crate::error::Result;
use crate::registry::Registry;
use crate::retention::{self, RetentionOutcome};

/// What happened to one repository
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub repository: String,
    /// Timestamped tags considered
    pub total: usize,
    /// Tags nominally past the expiration age
    pub expired: usize,
    /// Decision table row; absent if the tags could not be listed
    pub outcome: Option<RetentionOutcome>,
    /// Selected for deletion but not deleted (dry run)
    pub would_delete: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
    /// Transport error that left this repository untouched
    pub error: Option<String>,
}

impl RepositoryReport {
    fn new(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            total: 0,
            expired: 0,
            outcome: None,
            would_delete: Vec::new(),
            deleted: Vec::new(),
            failed: Vec::new(),
            error: None,
        }
    }
}

/// Result of pruning a whole namespace
#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    pub namespace: String,
    pub dry_run: bool,
    pub reference_date: NaiveDate,
    pub repositories: Vec<RepositoryReport>,
    /// Set when the repository listing itself failed
    pub error: Option<String>,
}

impl PruneReport {
    /// True if every attempted deletion succeeded
    pub fn success(&self) -> bool {
        self.repositories.iter().all(|r| r.failed.is_empty())
    }

    pub fn deleted_count(&self) -> usize {
        self.repositories.iter().map(|r| r.deleted.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.repositories.iter().map(|r| r.failed.len()).sum()
    }

    pub fn would_delete_count(&self) -> usize {
        self.repositories.iter().map(|r| r.would_delete.len()).sum()
    }
}

/// Applies a retention policy to every repository of a namespace
pub struct Pruner<'a, R: Registry> {
    registry: &'a R,
    policy: RetentionPolicy,
    today: NaiveDate,
    dry_run: bool,
}

impl<'a, R: Registry> Pruner<'a, R> {
    /// `today` is the reference date for every repository in the run.
    pub fn new(registry: &'a R, policy: RetentionPolicy, today: NaiveDate) -> Self {
        Self {
            registry,
            policy,
            today,
            dry_run: true,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Prune every repository in `namespace`.
    ///
    /// Listing failures leave the affected repositories untouched and are
    /// recorded in the report. A tag whose timestamp does not match the
    /// configured format aborts the run.
    pub async fn run(&self, namespace: &str) -> Result<PruneReport> {
        let mut report = PruneReport {
            namespace: namespace.to_string(),
            dry_run: self.dry_run,
            reference_date: self.today,
            repositories: Vec::new(),
            error: None,
        };

        let repositories = match self.registry.list_repositories(namespace).await {
            Ok(repositories) => repositories,
            Err(e) => {
                error!(
                    "Could not list repositories of {} on {}: {}",
                    namespace,
                    self.registry.name(),
                    e
                );
                report.error = Some(e.to_string());
                return Ok(report);
            }
        };

        for repository in &repositories {
            info!("Processing repository: {}", repository);
            report
                .repositories
                .push(self.prune_repository(namespace, repository).await?);
        }

        Ok(report)
    }

    /// Prune a single repository.
    pub async fn prune_repository(
        &self,
        namespace: &str,
        repository: &str,
    ) -> Result<RepositoryReport> {
        let mut report = RepositoryReport::new(repository);

        let tags = match self.registry.list_tags(namespace, repository).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!("Could not list tags of {}/{}: {}", namespace, repository, e);
                report.error = Some(e.to_string());
                return Ok(report);
            }
        };

        let decision = retention::expired_tags(&tags, &self.policy, self.today)?;
        report.total = decision.total;
        report.expired = decision.expired;
        report.outcome = Some(decision.outcome);

        for tag in decision.tags {
            if self.dry_run {
                info!("Image {}/{}:{} would be removed", namespace, repository, tag);
                report.would_delete.push(tag);
            } else if self.registry.delete_tag(namespace, repository, &tag).await {
                info!(
                    "Success. Removed expired tag: {}/{}:{}",
                    namespace, repository, tag
                );
                report.deleted.push(tag);
            } else {
                error!(
                    "Could not remove expired tag: {}/{}:{}",
                    namespace, repository, tag
                );
                report.failed.push(tag);
            }
        }

        Ok(report)
    }
}
