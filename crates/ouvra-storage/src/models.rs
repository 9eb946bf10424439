// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the offline action queue.

use chrono::{DateTime, SecondsFormat, Utc};
use strum::{Display, EnumString};

use ouvra_core::{ActionId, ActionKind, OfflineAction, OuvraError};

/// Lifecycle status of a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ActionStatus {
    /// Waiting for replay (or for its backoff window to elapse).
    Pending,
    /// Claimed by a drain pass, lock held until `locked_until`.
    Processing,
    /// Replayed and acknowledged by the remote side.
    Completed,
    /// Terminal: attempts exhausted or the action is non-retryable.
    Failed,
}

/// One row of the `offline_actions` table.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    pub id: i64,
    pub action_id: String,
    pub kind: String,
    pub payload: String,
    pub status: ActionStatus,
    pub attempts: i64,
    pub max_attempts: i64,
    pub last_error: Option<String>,
    pub enqueued_at: String,
    pub updated_at: String,
    pub next_retry_at: String,
    pub locked_until: Option<String>,
}

impl QueueEntry {
    /// Decode the stored payload back into its typed action.
    pub fn decode(&self) -> Result<ActionKind, OuvraError> {
        serde_json::from_str(&self.payload).map_err(|e| OuvraError::Storage {
            source: Box::new(e),
        })
    }

    /// Reconstruct the caller-facing action for this row.
    pub fn action(&self) -> Result<OfflineAction, OuvraError> {
        Ok(OfflineAction {
            id: ActionId(self.action_id.clone()),
            kind: self.decode()?,
            enqueued_at: parse_ts(&self.enqueued_at)?,
        })
    }
}

/// Per-status row counts for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}

/// Canonical timestamp encoding: RFC 3339 UTC with millisecond precision.
///
/// Lexicographic order equals chronological order, so SQL string comparisons
/// against `next_retry_at` and `locked_until` are sound.
pub(crate) fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>, OuvraError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| OuvraError::Storage {
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ActionStatus::Pending,
            ActionStatus::Processing,
            ActionStatus::Completed,
            ActionStatus::Failed,
        ] {
            let text = status.to_string();
            let back: ActionStatus = text.parse().unwrap();
            assert_eq!(status, back);
        }
        assert_eq!(ActionStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn timestamp_order_is_lexicographic() {
        let earlier = ts(Utc::now());
        let later = ts(Utc::now() + chrono::Duration::seconds(30));
        assert!(earlier < later);
    }
}
