//! Retention selection
//!
//! Decides which expired tags of a repository may be deleted while keeping at
//! least `minimum_images_to_keep` timestamped tags in place.
//!
//! Decision table, evaluated in order:
//! 1. nothing expired: delete nothing
//! 2. `total - expired >= floor`: delete every expired tag
//! 3. `total <= floor`: delete nothing
//! 4. otherwise: delete the `total - floor` oldest expired tags
//!
//! The floor is measured against the total tag count, so it can keep expired
//! tags alive.

use tracing::info;

use crate::config::RetentionPolicy;
use crate::retention::types::{ClassifiedTag, RetentionDecision, RetentionOutcome};

/// Select tags for deletion, oldest first.
pub fn select_for_deletion(
    mut tags: Vec<ClassifiedTag>,
    policy: &RetentionPolicy,
) -> RetentionDecision {
    // Stable: equal timestamps keep their input order.
    tags.sort_by_key(|t| t.timestamp());

    let total = tags.len();
    let floor = policy.minimum_images_to_keep;
    let expired: Vec<String> = tags
        .into_iter()
        .filter(|t| t.is_expired())
        .map(ClassifiedTag::into_tag)
        .collect();
    let expired_count = expired.len();

    info!("Total images with timestamp tags: {}", total);
    info!("Total images to expire, nominally: {}", expired_count);

    let (selected, outcome) = if expired_count == 0 {
        info!("No images will be removed");
        (Vec::new(), RetentionOutcome::NothingExpired)
    } else if total - expired_count >= floor {
        info!("All {} images with expired tags will be removed", expired_count);
        (expired, RetentionOutcome::AllExpiredRemovable)
    } else if total <= floor {
        info!(
            "In order to keep a minimum of {} timestamped images, none will be removed",
            floor
        );
        (Vec::new(), RetentionOutcome::FloorProtectsAll)
    } else {
        let removable = total - floor;
        info!(
            "Removing oldest {} images in order to keep a minimum of {} timestamped images",
            removable, floor
        );
        let mut selected = expired;
        selected.truncate(removable);
        (selected, RetentionOutcome::FloorLimited { removable })
    };

    RetentionDecision {
        tags: selected,
        total,
        expired: expired_count,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn tag(name: &str, day: u32, expired: bool) -> ClassifiedTag {
        ClassifiedTag::new(name, at(day), expired)
    }

    #[test]
    fn test_empty_input() {
        let decision = select_for_deletion(Vec::new(), &RetentionPolicy::default());
        assert!(decision.is_empty());
        assert_eq!(decision.total, 0);
        assert_eq!(decision.outcome, RetentionOutcome::NothingExpired);
    }

    #[test]
    fn test_unsorted_input_is_returned_oldest_first() {
        let tags = vec![
            tag("c", 3, true),
            tag("a", 1, true),
            tag("e", 5, false),
            tag("b", 2, true),
            tag("d", 4, false),
            tag("f", 6, false),
        ];

        let decision = select_for_deletion(tags, &RetentionPolicy::default());
        assert_eq!(decision.tags, vec!["a", "b", "c"]);
        assert_eq!(decision.outcome, RetentionOutcome::AllExpiredRemovable);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let tags = vec![
            tag("second", 1, true),
            tag("first", 1, true),
            tag("third", 1, true),
            tag("fourth", 1, true),
        ];

        let decision = select_for_deletion(tags, &RetentionPolicy::default());
        assert_eq!(decision.tags, vec!["second"]);
        assert_eq!(
            decision.outcome,
            RetentionOutcome::FloorLimited { removable: 1 }
        );
    }

    #[test]
    fn test_total_equal_to_floor_keeps_everything() {
        let tags = vec![tag("a", 1, true), tag("b", 2, true), tag("c", 3, true)];

        let decision = select_for_deletion(tags, &RetentionPolicy::default());
        assert!(decision.is_empty());
        assert_eq!(decision.outcome, RetentionOutcome::FloorProtectsAll);
    }

    #[test]
    fn test_huge_floor_keeps_everything() {
        let policy = RetentionPolicy {
            minimum_images_to_keep: usize::MAX,
            ..RetentionPolicy::default()
        };
        let tags = vec![tag("a", 1, true)];

        let decision = select_for_deletion(tags, &policy);
        assert!(decision.is_empty());
        assert_eq!(decision.outcome, RetentionOutcome::FloorProtectsAll);
    }

    #[test]
    fn test_huge_floor_with_fresh_tags() {
        let policy = RetentionPolicy {
            minimum_images_to_keep: usize::MAX,
            ..RetentionPolicy::default()
        };
        let tags = vec![tag("a", 1, true), tag("b", 2, false), tag("c", 3, false)];

        let decision = select_for_deletion(tags, &policy);
        assert!(decision.is_empty());
        assert_eq!(decision.outcome, RetentionOutcome::FloorProtectsAll);
    }

    #[test]
    fn test_custom_floor() {
        let policy = RetentionPolicy {
            minimum_images_to_keep: 1,
            ..RetentionPolicy::default()
        };
        let tags = vec![tag("a", 1, true), tag("b", 2, true), tag("c", 3, true)];

        let decision = select_for_deletion(tags, &policy);
        assert_eq!(decision.tags, vec!["a", "b"]);
    }
}
