// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable offline action queue.
//!
//! Ordered buffer of mutations that could not reach the remote API at
//! capture time. Replay order equals enqueue order (FIFO by rowid). Rows are
//! acknowledged individually after their whole replay sequence succeeds, so
//! an action enqueued while a drain is in flight is never discarded by that
//! drain.

use chrono::{Duration, Utc};
use rusqlite::params;

use ouvra_core::{ActionId, ActionKind, OfflineAction, OuvraError};

use crate::database::{Database, map_tr_err};
use crate::models::{ActionStatus, QueueCounts, QueueEntry, ts};

/// How long a `processing` claim is held before [`release_expired`] may
/// hand the row back to a later drain pass.
const LOCK_DURATION_MINUTES: i64 = 5;

const SELECT_COLS: &str = "id, action_id, kind, payload, status, attempts, max_attempts, \
     last_error, enqueued_at, updated_at, next_retry_at, locked_until";

/// Exponential backoff schedule for retryable replay failures.
///
/// Delay after the n-th failure is `base_secs * 2^(n-1)`, capped at
/// `cap_secs` (30s, 60s, 120s, ... by default).
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base_secs: u64,
    pub cap_secs: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_secs: 30,
            cap_secs: 300,
        }
    }
}

impl BackoffPolicy {
    /// Delay to apply after `attempts` failures (`attempts >= 1`).
    pub fn delay_after(&self, attempts: i64) -> Duration {
        let exp = attempts.saturating_sub(1).clamp(0, 16) as u32;
        let secs = self
            .base_secs
            .saturating_mul(1u64 << exp)
            .min(self.cap_secs);
        Duration::seconds(secs as i64)
    }
}

/// Append a captured mutation to the queue.
///
/// Mints a fresh [`ActionId`], stamps the capture time, and inserts a
/// `pending` row. Returns synchronously once the row is durable; callers
/// proceed as if the write succeeded (the replay happens later).
pub async fn enqueue(
    db: &Database,
    kind: &ActionKind,
    max_attempts: u32,
) -> Result<OfflineAction, OuvraError> {
    let action = OfflineAction {
        id: ActionId::fresh(),
        kind: kind.clone(),
        enqueued_at: Utc::now(),
    };
    let payload = serde_json::to_string(kind).map_err(|e| OuvraError::Storage {
        source: Box::new(e),
    })?;
    let action_id = action.id.0.clone();
    let tag = kind.tag();
    let now = ts(action.enqueued_at);

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO offline_actions
                     (action_id, kind, payload, status, attempts, max_attempts,
                      enqueued_at, updated_at, next_retry_at)
                 VALUES (?1, ?2, ?3, 'pending', 0, ?4, ?5, ?5, ?5)",
                params![action_id, tag, payload, max_attempts, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    tracing::debug!(action = %action.id, kind = tag, "action enqueued");
    Ok(action)
}

/// Read all pending actions in enqueue order, without mutating them.
pub async fn list_pending(db: &Database) -> Result<Vec<OfflineAction>, OuvraError> {
    let entries = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLS} FROM offline_actions
                 WHERE status = 'pending' ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map([], entry_from_row)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)?;

    entries.iter().map(QueueEntry::action).collect()
}

/// Claim the next eligible pending entry for replay.
///
/// Atomically selects the oldest pending row whose backoff window has
/// elapsed and marks it `processing` with a lock timeout. Returns `None`
/// when nothing is eligible.
pub async fn dequeue(db: &Database) -> Result<Option<QueueEntry>, OuvraError> {
    let now_dt = Utc::now();
    let now = ts(now_dt);
    let lock_until = ts(now_dt + Duration::minutes(LOCK_DURATION_MINUTES));

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let result = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLS} FROM offline_actions
                     WHERE status = 'pending' AND next_retry_at <= ?1
                     ORDER BY id ASC
                     LIMIT 1"
                ))?;
                stmt.query_row(params![now], entry_from_row)
            };

            match result {
                Ok(entry) => {
                    tx.execute(
                        "UPDATE offline_actions
                         SET status = 'processing', locked_until = ?1, updated_at = ?2
                         WHERE id = ?3",
                        params![lock_until, now, entry.id],
                    )?;
                    tx.commit()?;
                    Ok(Some(QueueEntry {
                        status: ActionStatus::Processing,
                        locked_until: Some(lock_until),
                        updated_at: now,
                        ..entry
                    }))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    tx.commit()?;
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Acknowledge a fully replayed entry.
pub async fn ack(db: &Database, id: i64) -> Result<(), OuvraError> {
    let now = ts(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE offline_actions
                 SET status = 'completed', locked_until = NULL, updated_at = ?1
                 WHERE id = ?2",
                params![now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Record a retryable replay failure.
///
/// Increments attempts. Below `max_attempts` the row returns to `pending`
/// with its next retry pushed out by the backoff schedule; at `max_attempts`
/// it becomes terminal `failed`. Returns the resulting status.
pub async fn fail(
    db: &Database,
    id: i64,
    error: &str,
    backoff: &BackoffPolicy,
) -> Result<ActionStatus, OuvraError> {
    let error = error.to_string();
    let backoff = *backoff;
    let now_dt = Utc::now();
    let now = ts(now_dt);

    db.connection()
        .call(move |conn| {
            let (attempts, max_attempts): (i64, i64) = conn.query_row(
                "SELECT attempts, max_attempts FROM offline_actions WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let new_attempts = attempts + 1;
            if new_attempts >= max_attempts {
                conn.execute(
                    "UPDATE offline_actions
                     SET status = 'failed', attempts = ?1, last_error = ?2,
                         locked_until = NULL, updated_at = ?3
                     WHERE id = ?4",
                    params![new_attempts, error, now, id],
                )?;
                Ok(ActionStatus::Failed)
            } else {
                let retry_at = ts(now_dt + backoff.delay_after(new_attempts));
                conn.execute(
                    "UPDATE offline_actions
                     SET status = 'pending', attempts = ?1, last_error = ?2,
                         locked_until = NULL, updated_at = ?3, next_retry_at = ?4
                     WHERE id = ?5",
                    params![new_attempts, error, now, retry_at, id],
                )?;
                Ok(ActionStatus::Pending)
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Mark an entry terminally failed without consuming a retry.
///
/// For non-retryable local errors (an unreadable photo file will not
/// reappear on a later pass).
pub async fn discard(db: &Database, id: i64, error: &str) -> Result<(), OuvraError> {
    let error = error.to_string();
    let now = ts(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE offline_actions
                 SET status = 'failed', last_error = ?1, locked_until = NULL, updated_at = ?2
                 WHERE id = ?3",
                params![error, now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Return expired `processing` claims to `pending`.
///
/// Run at driver startup so rows stranded by a crash mid-drain become
/// eligible again. Returns the number of released rows.
pub async fn release_expired(db: &Database) -> Result<usize, OuvraError> {
    let now = ts(Utc::now());
    db.connection()
        .call(move |conn| {
            let released = conn.execute(
                "UPDATE offline_actions
                 SET status = 'pending', locked_until = NULL, updated_at = ?1
                 WHERE status = 'processing'
                   AND locked_until IS NOT NULL AND locked_until <= ?1",
                params![now],
            )?;
            Ok(released)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete acknowledged rows. Returns the number removed.
pub async fn clear_completed(db: &Database) -> Result<usize, OuvraError> {
    db.connection()
        .call(|conn| {
            let removed = conn.execute(
                "DELETE FROM offline_actions WHERE status = 'completed'",
                [],
            )?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}

/// Per-status row counts.
pub async fn counts(db: &Database) -> Result<QueueCounts, OuvraError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM offline_actions GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut counts = QueueCounts::default();
            for row in rows {
                let (status, n) = row?;
                match status.as_str() {
                    "pending" => counts.pending = n,
                    "processing" => counts.processing = n,
                    "completed" => counts.completed = n,
                    "failed" => counts.failed = n,
                    _ => {}
                }
            }
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QueueEntry> {
    let status_text: String = row.get(4)?;
    let status: ActionStatus = status_text.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(QueueEntry {
        id: row.get(0)?,
        action_id: row.get(1)?,
        kind: row.get(2)?,
        payload: row.get(3)?,
        status,
        attempts: row.get(5)?,
        max_attempts: row.get(6)?,
        last_error: row.get(7)?,
        enqueued_at: row.get(8)?,
        updated_at: row.get(9)?,
        next_retry_at: row.get(10)?,
        locked_until: row.get(11)?,
    })
}
