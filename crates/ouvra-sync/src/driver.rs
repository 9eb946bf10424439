// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconnect-triggered synchronization driver.
//!
//! Sits idle on the connectivity signal and drains the offline queue
//! whenever reachability comes back. A drain is a single sequential pass:
//! each action's full replay sequence is awaited, and the row is
//! acknowledged only after the remote side confirmed every step. Per-item
//! failures never propagate out of the drain; they are recorded on the row
//! (with backoff for retryable ones) and summarized in the result.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use ouvra_config::model::SyncConfig;
use ouvra_core::{ActionKind, ConnectivityLink, OuvraError, PhotoRef, RemoteApi, ReportUpload};
use ouvra_storage::{ActionStatus, BackoffPolicy, Database, PhotoStore, QueueEntry, queue};

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    /// Actions fully replayed and acknowledged.
    pub replayed: usize,
    /// Actions that failed a retryable step and went back to pending.
    pub retried: usize,
    /// Actions that became terminally failed (attempts exhausted or
    /// non-retryable local error).
    pub dropped: usize,
}

impl DrainSummary {
    /// Total number of actions touched by the pass.
    pub fn total(&self) -> usize {
        self.replayed + self.retried + self.dropped
    }
}

/// Replays queued offline actions against the remote API.
#[derive(Clone)]
pub struct SyncDriver {
    db: Database,
    photos: PhotoStore,
    remote: Arc<dyn RemoteApi>,
    backoff: BackoffPolicy,
    purge_uploaded_photos: bool,
}

impl SyncDriver {
    pub fn new(
        db: Database,
        photos: PhotoStore,
        remote: Arc<dyn RemoteApi>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            db,
            photos,
            remote,
            backoff: BackoffPolicy {
                base_secs: config.retry_base_secs,
                cap_secs: config.retry_cap_secs,
            },
            purge_uploaded_photos: config.purge_uploaded_photos,
        }
    }

    /// Idle on the connectivity signal and drain whenever it reads online.
    ///
    /// Also drains once at startup when already online, so a backlog left
    /// by a previous session is not stuck waiting for the next transition.
    /// Returns when the producer side of the link is dropped.
    pub async fn run(&self, link: &ConnectivityLink) {
        if let Ok(released) = queue::release_expired(&self.db).await
            && released > 0
        {
            warn!(released, "released stale processing claims from a previous session");
        }

        let mut rx = link.subscribe();
        if *rx.borrow_and_update() {
            self.drain().await;
        }

        // Every online observation triggers a pass; offline edges are
        // ignored. A repeat observation over an empty queue makes no remote
        // calls, and a fast offline/online flip cannot be missed even when
        // the watch channel collapses the intermediate value.
        while rx.changed().await.is_ok() {
            if *rx.borrow_and_update() {
                self.drain().await;
            }
        }
        debug!("connectivity link closed, sync driver stopping");
    }

    /// Drain the queue: replay every eligible action, strictly in enqueue
    /// order, acknowledging each one only after full remote confirmation.
    pub async fn drain(&self) -> DrainSummary {
        let mut summary = DrainSummary::default();

        let pending = match queue::counts(&self.db).await {
            Ok(counts) => counts.pending,
            Err(e) => {
                error!(error = %e, "could not inspect queue, skipping drain");
                return summary;
            }
        };
        if pending == 0 {
            return summary;
        }
        info!(pending, "synchronization started");

        loop {
            let entry = match queue::dequeue(&self.db).await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "dequeue failed, aborting drain");
                    break;
                }
            };

            match self.replay(&entry).await {
                Ok(uploaded) => {
                    if let Err(e) = queue::ack(&self.db, entry.id).await {
                        // The replay succeeded; a failed ack means the row
                        // will be replayed again next drain (at-least-once).
                        error!(action = %entry.action_id, error = %e, "ack failed");
                    }
                    summary.replayed += 1;
                    debug!(action = %entry.action_id, kind = %entry.kind, "action replayed");
                    self.purge(&uploaded);
                }
                Err(e) if e.is_retryable() => {
                    let status = queue::fail(&self.db, entry.id, &e.to_string(), &self.backoff)
                        .await
                        .unwrap_or_else(|store_err| {
                            error!(action = %entry.action_id, error = %store_err, "fail() failed");
                            ActionStatus::Pending
                        });
                    match status {
                        ActionStatus::Failed => {
                            warn!(action = %entry.action_id, error = %e, "attempts exhausted, action dropped");
                            summary.dropped += 1;
                        }
                        _ => {
                            warn!(action = %entry.action_id, error = %e, "replay failed, will retry");
                            summary.retried += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(action = %entry.action_id, error = %e, "non-retryable replay error, action dropped");
                    if let Err(store_err) = queue::discard(&self.db, entry.id, &e.to_string()).await
                    {
                        error!(action = %entry.action_id, error = %store_err, "discard failed");
                    }
                    summary.dropped += 1;
                }
            }
        }

        info!(
            replayed = summary.replayed,
            retried = summary.retried,
            dropped = summary.dropped,
            "synchronization finished"
        );
        summary
    }

    /// Replay one action. Returns the local photo refs whose uploads were
    /// confirmed, so the caller can purge them after the ack.
    async fn replay(&self, entry: &QueueEntry) -> Result<Vec<PhotoRef>, OuvraError> {
        match entry.decode()? {
            ActionKind::CreateSite { site } => {
                let record = self.remote.create_site(&site).await?;
                debug!(site = %record.id, "site created remotely");
                Ok(Vec::new())
            }
            ActionKind::CreateReportWithPhoto { report, photos } => {
                // Two-phase flow: every photo upload must resolve before the
                // report record referencing its URL is created.
                let mut photo_urls = Vec::with_capacity(photos.len());
                for photo in &photos {
                    let bytes = self.photos.read(photo)?;
                    let upload = self.remote.upload_photo(bytes, &photo.0).await?;
                    photo_urls.push(upload.url);
                }
                let record = self
                    .remote
                    .create_report(&ReportUpload { report, photo_urls })
                    .await?;
                debug!(report = %record.id, photos = photos.len(), "report created remotely");
                Ok(photos)
            }
        }
    }

    /// Best-effort purge of locally buffered photos after an ack.
    fn purge(&self, uploaded: &[PhotoRef]) {
        if !self.purge_uploaded_photos {
            return;
        }
        for photo in uploaded {
            if let Err(e) = self.photos.remove(photo) {
                warn!(photo = %photo, error = %e, "could not purge uploaded photo");
            }
        }
    }
}
