//! Status lifecycles with first-reach timestamps.
//!
//! Inquiries and admission inquiries record, per non-initial status, the moment
//! that status was first reached. Later transitions never clear or move those stamps.

use chrono::{DateTime, Utc};

use crate::validation::ValidationError;

pub trait StatusLifecycle: Copy + Eq + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Column stamped the first time this status is reached, if any.
    fn timestamp_column(&self) -> Option<&'static str>;
}

/// Parse a status name, reporting unknown values against the `status` field.
pub fn parse_status<S: StatusLifecycle>(value: &str) -> Result<S, ValidationError> {
    S::ALL
        .iter()
        .copied()
        .find(|s| s.as_str() == value)
        .ok_or_else(|| {
            let allowed: Vec<&str> = S::ALL.iter().map(|s| s.as_str()).collect();
            ValidationError::single(
                "status",
                format!("The selected status is invalid. Allowed: {}.", allowed.join(", ")),
            )
        })
}

/// Set `slot` to `now` unless it already holds a value.
pub fn stamp_once(slot: &mut Option<DateTime<Utc>>, now: DateTime<Utc>) {
    slot.get_or_insert(now);
}
