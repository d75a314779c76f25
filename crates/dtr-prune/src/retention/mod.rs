//! Retention decisions for timestamped image tags
//!
//! The classifier turns raw tag names into [`ClassifiedTag`] records and the
//! selector applies the minimum-retention floor to pick deletions.

pub mod classifier;
pub mod selector;
pub mod types;

pub use crate::config::RetentionPolicy;
pub use classifier::{classify_tags, is_expired, parse_timestamp, timestamp_part};
pub use selector::select_for_deletion;
pub use types::{ClassifiedTag, RetentionDecision, RetentionOutcome};

use chrono::NaiveDate;

use crate::error::Result;

/// Classify raw tag names and select the ones to delete.
pub fn expired_tags<S: AsRef<str>>(
    tags: &[S],
    policy: &RetentionPolicy,
    today: NaiveDate,
) -> Result<RetentionDecision> {
    let classified = classify_tags(tags, policy, today)?;
    Ok(select_for_deletion(classified, policy))
}
