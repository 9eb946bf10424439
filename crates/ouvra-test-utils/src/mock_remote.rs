// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording remote API double.
//!
//! Implements [`RemoteApi`] with an ordered call log for assertions and
//! scriptable per-endpoint failure counts. Uploads return deterministic
//! URLs derived from the filename, so tests can check URL correlation
//! between the upload and create-report phases.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ouvra_core::{
    OuvraError, PhotoUpload, RemoteApi, ReportRecord, ReportUpload, SiteDraft, SiteRecord,
};

/// One observed remote call, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    CreateSite {
        nom: String,
    },
    UploadPhoto {
        filename: String,
    },
    CreateReport {
        titre: String,
        photo_urls: Vec<String>,
    },
}

/// A remote API double that records every call.
#[derive(Default)]
pub struct RecordingRemote {
    calls: Arc<Mutex<Vec<RemoteCall>>>,
    fail_create_site: AtomicUsize,
    fail_upload_photo: AtomicUsize,
    fail_create_report: AtomicUsize,
    next_id: AtomicUsize,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// All observed calls, in order.
    pub async fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    /// Observed create-site calls only, in order.
    pub async fn created_sites(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                RemoteCall::CreateSite { nom } => Some(nom.clone()),
                _ => None,
            })
            .collect()
    }

    /// Fail the next `n` create-site calls with a retryable API error.
    pub fn fail_next_create_site(&self, n: usize) {
        self.fail_create_site.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` photo uploads with a retryable API error.
    pub fn fail_next_upload_photo(&self, n: usize) {
        self.fail_upload_photo.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` create-report calls with a retryable API error.
    pub fn fail_next_create_report(&self, n: usize) {
        self.fail_create_report.store(n, Ordering::SeqCst);
    }

    /// The deterministic URL this double returns for an uploaded filename.
    pub fn url_for(filename: &str) -> String {
        format!("https://cdn.test/{filename}")
    }

    async fn record(&self, call: RemoteCall) {
        self.calls.lock().await.push(call);
    }

    fn take_failure(counter: &AtomicUsize, what: &str) -> Result<(), OuvraError> {
        if counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(OuvraError::Api {
                message: format!("simulated {what} failure"),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for RecordingRemote {
    async fn create_site(&self, site: &SiteDraft) -> Result<SiteRecord, OuvraError> {
        self.record(RemoteCall::CreateSite {
            nom: site.nom.clone(),
        })
        .await;
        Self::take_failure(&self.fail_create_site, "create-site")?;
        Ok(SiteRecord {
            id: format!("srv-ch-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            nom: site.nom.clone(),
        })
    }

    async fn upload_photo(
        &self,
        _bytes: Vec<u8>,
        filename: &str,
    ) -> Result<PhotoUpload, OuvraError> {
        self.record(RemoteCall::UploadPhoto {
            filename: filename.to_string(),
        })
        .await;
        Self::take_failure(&self.fail_upload_photo, "upload-photo")?;
        Ok(PhotoUpload {
            url: Self::url_for(filename),
        })
    }

    async fn create_report(&self, report: &ReportUpload) -> Result<ReportRecord, OuvraError> {
        self.record(RemoteCall::CreateReport {
            titre: report.report.titre.clone(),
            photo_urls: report.photo_urls.clone(),
        })
        .await;
        Self::take_failure(&self.fail_create_report, "create-report")?;
        Ok(ReportRecord {
            id: format!("srv-rp-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            titre: report.report.titre.clone(),
        })
    }
}
