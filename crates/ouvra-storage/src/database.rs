// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The capture path (enqueue) and the sync path (dequeue/ack/fail)
//! share this one writer, so their read-modify-write cycles never interleave.

use tracing::debug;

use ouvra_core::OuvraError;

use crate::migrations;

/// Handle to the device-local SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, OuvraError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(map_sqlite_err)?;
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(map_sqlite_err)?;
            conn.pragma_update(None, "busy_timeout", 5000)
                .map_err(map_sqlite_err)?;
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(map_sqlite_err)?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_call_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The shared single-writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), OuvraError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> OuvraError {
    OuvraError::Storage {
        source: Box::new(e),
    }
}

/// Map a bare rusqlite error into the workspace error type.
fn map_sqlite_err(e: rusqlite::Error) -> OuvraError {
    OuvraError::Storage {
        source: Box::new(e),
    }
}

/// Flatten a tokio-rusqlite call error whose application-error type is
/// [`OuvraError`] back into an [`OuvraError`].
fn map_call_err(e: tokio_rusqlite::Error<OuvraError>) -> OuvraError {
    match e {
        tokio_rusqlite::Error::Error(inner) => inner,
        tokio_rusqlite::Error::ConnectionClosed => {
            OuvraError::Storage { source: "database connection closed".into() }
        }
        tokio_rusqlite::Error::Close((_, source)) => {
            OuvraError::Storage { source: Box::new(source) }
        }
        other => OuvraError::Storage { source: other.to_string().into() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_file_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ouvra.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists());

        // Migrated tables are queryable.
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row("SELECT COUNT(*) FROM offline_actions", [], |row| {
                    row.get(0)
                })?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ouvra.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();

        // Second open re-runs the migration runner against an up-to-date schema.
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }
}
