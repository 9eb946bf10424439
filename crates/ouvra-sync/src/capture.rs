// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write capture path.
//!
//! Routes a user write either directly to the remote API (online) or into
//! the offline queue (offline, or when the direct call fails). Capture
//! returns synchronously once the action is durable; the UI proceeds as if
//! the write succeeded and the replay happens in the background.

use std::sync::Arc;

use tracing::{debug, warn};

use ouvra_core::{
    ActionKind, ConnectivityLink, OfflineAction, OuvraError, RemoteApi, ReportDraft, ReportRecord,
    ReportUpload, SiteDraft, SiteRecord,
};
use ouvra_storage::{Database, PhotoStore, queue};

/// Outcome of a submitted write.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// The remote API acknowledged the write immediately.
    Sent(T),
    /// The write was captured for later replay.
    Queued(OfflineAction),
}

impl<T> Submission<T> {
    pub fn is_queued(&self) -> bool {
        matches!(self, Submission::Queued(_))
    }
}

/// Routes writes between the remote API and the offline queue.
pub struct WriteRouter {
    db: Database,
    photos: PhotoStore,
    remote: Arc<dyn RemoteApi>,
    link: ConnectivityLink,
    max_attempts: u32,
}

impl WriteRouter {
    pub fn new(
        db: Database,
        photos: PhotoStore,
        remote: Arc<dyn RemoteApi>,
        link: ConnectivityLink,
        max_attempts: u32,
    ) -> Self {
        Self {
            db,
            photos,
            remote,
            link,
            max_attempts,
        }
    }

    /// Submit a site creation.
    pub async fn submit_site(
        &self,
        site: SiteDraft,
    ) -> Result<Submission<SiteRecord>, OuvraError> {
        if self.link.is_online() {
            match self.remote.create_site(&site).await {
                Ok(record) => return Ok(Submission::Sent(record)),
                Err(e) => {
                    warn!(error = %e, "direct site creation failed, capturing offline");
                }
            }
        }

        let action = queue::enqueue(
            &self.db,
            &ActionKind::CreateSite { site },
            self.max_attempts,
        )
        .await?;
        debug!(action = %action.id, "site creation captured");
        Ok(Submission::Queued(action))
    }

    /// Submit a report with its photos, given as `(filename, bytes)` pairs
    /// straight from the capture flow.
    ///
    /// When the write is captured offline, the photos are written to the
    /// photo area before the action row is inserted, so the queue never
    /// references bytes that only existed in memory.
    pub async fn submit_report(
        &self,
        report: ReportDraft,
        photos: Vec<(String, Vec<u8>)>,
    ) -> Result<Submission<ReportRecord>, OuvraError> {
        if self.link.is_online() {
            match self.send_report_direct(&report, &photos).await {
                Ok(record) => return Ok(Submission::Sent(record)),
                Err(e) => {
                    warn!(error = %e, "direct report creation failed, capturing offline");
                }
            }
        }

        let mut refs = Vec::with_capacity(photos.len());
        for (name, bytes) in &photos {
            refs.push(self.photos.save(name, bytes)?);
        }
        let action = queue::enqueue(
            &self.db,
            &ActionKind::CreateReportWithPhoto {
                report,
                photos: refs,
            },
            self.max_attempts,
        )
        .await?;
        debug!(action = %action.id, photos = photos.len(), "report captured");
        Ok(Submission::Queued(action))
    }

    /// Online path: two-phase upload-then-create, fully awaited.
    async fn send_report_direct(
        &self,
        report: &ReportDraft,
        photos: &[(String, Vec<u8>)],
    ) -> Result<ReportRecord, OuvraError> {
        let mut photo_urls = Vec::with_capacity(photos.len());
        for (name, bytes) in photos {
            let upload = self.remote.upload_photo(bytes.clone(), name).await?;
            photo_urls.push(upload.url);
        }
        self.remote
            .create_report(&ReportUpload {
                report: report.clone(),
                photo_urls,
            })
            .await
    }
}
