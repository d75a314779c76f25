//! Tag classification
//!
//! Splits tag names of the form `<label>-<timestamp>`, parses the timestamp
//! with the configured chrono format and marks tags past the expiration age.

use chrono::format::ParseErrorKind;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::config::RetentionPolicy;
use crate::error::{PruneError, Result};
use crate::retention::types::ClassifiedTag;

/// Returns the timestamp part of a tag name, if the tag follows the
/// `<label>-<timestamp>` convention.
pub fn timestamp_part(tag: &str) -> Option<&str> {
    match tag.split_once('-') {
        Some((_, rest)) if !rest.is_empty() => Some(rest),
        _ => None,
    }
}

/// Parse a timestamp with `format`. Formats that only carry date fields are
/// read as midnight of that date.
pub fn parse_timestamp(
    raw: &str,
    format: &str,
) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    match NaiveDateTime::parse_from_str(raw, format) {
        Ok(ts) => Ok(ts),
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            NaiveDate::parse_from_str(raw, format).map(|d| d.and_time(NaiveTime::MIN))
        }
        Err(e) => Err(e),
    }
}

/// Whether a tag stamped at `timestamp` is past `expiration_age_days` on `today`.
///
/// Only the calendar date of the timestamp counts.
pub fn is_expired(timestamp: NaiveDateTime, expiration_age_days: u32, today: NaiveDate) -> bool {
    timestamp
        .date()
        .checked_add_days(Days::new(u64::from(expiration_age_days)))
        .is_some_and(|cutoff| cutoff < today)
}

/// Classify the tags of one repository.
///
/// Tags without a timestamp part are skipped. A timestamp part that does not
/// match the policy's format aborts classification with [`PruneError::Parse`].
pub fn classify_tags<S: AsRef<str>>(
    tags: &[S],
    policy: &RetentionPolicy,
    today: NaiveDate,
) -> Result<Vec<ClassifiedTag>> {
    let mut classified = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = tag.as_ref();
        let Some(raw) = timestamp_part(tag) else {
            debug!("Tag '{}' has no timestamp suffix, ignoring", tag);
            continue;
        };

        let timestamp =
            parse_timestamp(raw, &policy.datetime_format).map_err(|source| PruneError::Parse {
                tag: tag.to_string(),
                format: policy.datetime_format.clone(),
                source,
            })?;

        let expired = is_expired(timestamp, policy.expiration_age_days, today);
        classified.push(ClassifiedTag::new(tag, timestamp, expired));
    }

    Ok(classified)
}
