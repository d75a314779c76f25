//! dtr-prune - Remove expired timestamped image tags from a registry namespace
//!
//! Tags named `<label>-<timestamp>` are classified by age and deleted once
//! expired, while every repository keeps a minimum number of timestamped tags.

pub mod config;
pub mod error;
pub mod prune;
pub mod registry;
pub mod retention;
pub mod testing;

pub use config::{Config, RegistryConfig, RetentionPolicy};
pub use error::{PruneError, Result};
pub use prune::{PruneReport, Pruner, RepositoryReport};
pub use registry::{DtrClient, Registry};
pub use retention::{ClassifiedTag, RetentionDecision, RetentionOutcome};
