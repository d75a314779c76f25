//! Retention types
//!
//! Classified tag records and the deletion decision produced for a single
//! repository.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A tag whose name carried a parseable timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTag {
    tag: String,
    timestamp: NaiveDateTime,
    expired: bool,
}

impl ClassifiedTag {
    pub fn new(tag: impl Into<String>, timestamp: NaiveDateTime, expired: bool) -> Self {
        Self {
            tag: tag.into(),
            timestamp,
            expired,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn into_tag(self) -> String {
        self.tag
    }
}

/// Which row of the retention table produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetentionOutcome {
    /// No tag is past the expiration age
    NothingExpired,
    /// Enough unexpired tags remain to satisfy the floor on their own
    AllExpiredRemovable,
    /// The repository holds no more tags than the floor
    FloorProtectsAll,
    /// Only the oldest `removable` expired tags may go
    FloorLimited { removable: usize },
}

/// Tags selected for deletion in one repository, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionDecision {
    /// Tag names to delete, in increasing timestamp order
    pub tags: Vec<String>,
    /// Timestamped tags considered
    pub total: usize,
    /// Tags nominally past the expiration age
    pub expired: usize,
    pub outcome: RetentionOutcome,
}

impl RetentionDecision {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
