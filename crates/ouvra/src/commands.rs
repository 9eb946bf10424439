// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.

use std::sync::Arc;

use tracing::info;

use ouvra_api::{ConnectivityProbe, HttpRemoteApi};
use ouvra_config::OuvraConfig;
use ouvra_core::{ConnectivityLink, OuvraError, RemoteApi};
use ouvra_storage::{Database, PhotoStore, queue};
use ouvra_sync::SyncDriver;

/// Open the storage pair every subcommand needs.
async fn open_storage(config: &OuvraConfig) -> Result<(Database, PhotoStore), OuvraError> {
    let db = Database::open(&config.storage.database_path).await?;
    let photos = PhotoStore::open(&config.storage.photo_dir)?;
    Ok((db, photos))
}

/// `ouvra status` - queue counts and backend reachability.
pub async fn status(config: &OuvraConfig) -> Result<(), OuvraError> {
    let (db, _photos) = open_storage(config).await?;
    let counts = queue::counts(&db).await?;

    let link = ConnectivityLink::default();
    let probe = ConnectivityProbe::new(&config.api, config.sync.probe_interval_secs, link)?;
    let reachable = probe.check().await;

    println!(
        "queue: {} pending, {} processing, {} completed, {} failed",
        counts.pending, counts.processing, counts.completed, counts.failed
    );
    println!(
        "backend: {} ({})",
        config.api.base_url,
        if reachable { "reachable" } else { "unreachable" }
    );

    db.close().await?;
    Ok(())
}

/// `ouvra drain` - one replay pass over the queue.
pub async fn drain(config: &OuvraConfig) -> Result<(), OuvraError> {
    let (db, photos) = open_storage(config).await?;
    let remote: Arc<dyn RemoteApi> = Arc::new(HttpRemoteApi::new(&config.api)?);
    let driver = SyncDriver::new(db.clone(), photos, remote, &config.sync);

    let released = queue::release_expired(&db).await?;
    if released > 0 {
        info!(released, "released stale processing claims");
    }

    let summary = driver.drain().await;
    println!(
        "drain: {} replayed, {} retried, {} dropped",
        summary.replayed, summary.retried, summary.dropped
    );

    db.close().await?;
    Ok(())
}

/// `ouvra watch` - probe connectivity and drain on every reconnect.
pub async fn watch(config: &OuvraConfig) -> Result<(), OuvraError> {
    let (db, photos) = open_storage(config).await?;
    let remote: Arc<dyn RemoteApi> = Arc::new(HttpRemoteApi::new(&config.api)?);

    let link = ConnectivityLink::default();
    let probe = ConnectivityProbe::new(&config.api, config.sync.probe_interval_secs, link.clone())?;
    let driver = SyncDriver::new(db, photos, remote, &config.sync);

    info!(
        backend = %config.api.base_url,
        interval = config.sync.probe_interval_secs,
        "watching connectivity"
    );
    tokio::spawn(probe.run());

    tokio::select! {
        _ = driver.run(&link) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, stopping");
        }
    }
    Ok(())
}

/// `ouvra config` - dump the effective configuration as TOML.
pub fn show_config(config: &OuvraConfig) -> Result<(), OuvraError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| OuvraError::Internal(format!("could not render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}
