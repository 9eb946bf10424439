// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end sync testing.
//!
//! Assembles a complete sync stack — temp SQLite database, photo area,
//! connectivity link, recording remote, write router, and sync driver —
//! so integration tests drive the same wiring the binary uses.

use std::sync::Arc;

use ouvra_config::model::SyncConfig;
use ouvra_core::ConnectivityLink;
use ouvra_storage::{Database, PhotoStore};
use ouvra_sync::{SyncDriver, WriteRouter};

use crate::mock_remote::RecordingRemote;

/// A fully wired sync stack over temp storage.
pub struct SyncHarness {
    pub db: Database,
    /// Path of the temp database, for restart-simulation tests.
    pub db_path: std::path::PathBuf,
    pub photos: PhotoStore,
    pub remote: Arc<RecordingRemote>,
    pub link: ConnectivityLink,
    pub driver: SyncDriver,
    pub router: WriteRouter,
    _tmp: tempfile::TempDir,
}

impl SyncHarness {
    /// Harness starting offline, with zero retry backoff so failed actions
    /// are immediately eligible again.
    pub async fn offline() -> Self {
        Self::build(false, Self::test_sync_config()).await
    }

    /// Harness starting online.
    pub async fn online() -> Self {
        Self::build(true, Self::test_sync_config()).await
    }

    /// Harness with a custom `[sync]` section.
    pub async fn with_config(initially_online: bool, config: SyncConfig) -> Self {
        Self::build(initially_online, config).await
    }

    /// Default test tuning: no backoff, so drains observe retries without
    /// waiting on wall-clock time.
    pub fn test_sync_config() -> SyncConfig {
        SyncConfig {
            retry_base_secs: 0,
            retry_cap_secs: 0,
            ..SyncConfig::default()
        }
    }

    async fn build(initially_online: bool, config: SyncConfig) -> Self {
        let tmp = tempfile::tempdir().expect("temp dir");
        let db_path = tmp.path().join("ouvra-test.db");
        let db = Database::open(db_path.to_str().expect("utf-8 temp path"))
            .await
            .expect("open test database");
        let photos = PhotoStore::open(tmp.path().join("photos")).expect("open photo area");
        let remote = Arc::new(RecordingRemote::new());
        let link = ConnectivityLink::new(initially_online);

        let driver = SyncDriver::new(db.clone(), photos.clone(), remote.clone(), &config);
        let router = WriteRouter::new(
            db.clone(),
            photos.clone(),
            remote.clone(),
            link.clone(),
            config.max_attempts,
        );

        Self {
            db,
            db_path,
            photos,
            remote,
            link,
            driver,
            router,
            _tmp: tmp,
        }
    }
}
