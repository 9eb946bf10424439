// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Last-write-wins snapshot cache.
//!
//! Flat key/value store for read-path data the app shows while offline
//! (site lists, inventory snapshots). Each `put` replaces the previous
//! snapshot under the same name wholesale; there is no merging.

use chrono::Utc;
use rusqlite::params;
use serde::Serialize;
use serde::de::DeserializeOwned;

use ouvra_core::OuvraError;

use crate::database::{Database, map_tr_err};
use crate::models::ts;

/// Store a snapshot under `name`, replacing any previous value.
pub async fn put<T: Serialize>(db: &Database, name: &str, value: &T) -> Result<(), OuvraError> {
    let name = name.to_string();
    let json = serde_json::to_string(value).map_err(|e| OuvraError::Storage {
        source: Box::new(e),
    })?;
    let now = ts(Utc::now());

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO snapshot_cache (name, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![name, json, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Load the snapshot stored under `name`, if any.
pub async fn get<T: DeserializeOwned>(
    db: &Database,
    name: &str,
) -> Result<Option<T>, OuvraError> {
    let name = name.to_string();
    let json = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT value FROM snapshot_cache WHERE name = ?1",
                params![name],
                |row| row.get::<_, String>(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match json {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| OuvraError::Storage {
                source: Box::new(e),
            }),
        None => Ok(None),
    }
}

/// Drop the snapshot stored under `name`.
pub async fn remove(db: &Database, name: &str) -> Result<(), OuvraError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM snapshot_cache WHERE name = ?1", params![name])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (db, _dir) = setup_db().await;

        put(&db, "chantiers", &vec!["Site A", "Site B"]).await.unwrap();
        let back: Option<Vec<String>> = get(&db, "chantiers").await.unwrap();
        assert_eq!(back, Some(vec!["Site A".to_string(), "Site B".to_string()]));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn last_write_wins() {
        let (db, _dir) = setup_db().await;

        put(&db, "inventaire", &1).await.unwrap();
        put(&db, "inventaire", &2).await.unwrap();
        let back: Option<i64> = get(&db, "inventaire").await.unwrap();
        assert_eq!(back, Some(2));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_name_is_none() {
        let (db, _dir) = setup_db().await;
        let back: Option<String> = get(&db, "absent").await.unwrap();
        assert!(back.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn remove_drops_the_snapshot() {
        let (db, _dir) = setup_db().await;

        put(&db, "equipes", &vec!["A"]).await.unwrap();
        remove(&db, "equipes").await.unwrap();
        let back: Option<Vec<String>> = get(&db, "equipes").await.unwrap();
        assert!(back.is_none());

        db.close().await.unwrap();
    }
}
