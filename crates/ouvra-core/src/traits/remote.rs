// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote API trait for the backend the sync core replays against.

use async_trait::async_trait;

use crate::error::OuvraError;
use crate::types::{PhotoUpload, ReportRecord, ReportUpload, SiteDraft, SiteRecord};

/// The three logical remote calls used by the sync core.
///
/// Treated as a black box: each call either succeeds with a result payload
/// or fails with [`OuvraError::Api`]. Authentication is the implementor's
/// concern (the HTTP client attaches the bearer token at construction).
#[async_trait]
pub trait RemoteApi: Send + Sync + 'static {
    /// Create a site record.
    async fn create_site(&self, site: &SiteDraft) -> Result<SiteRecord, OuvraError>;

    /// Upload raw photo bytes, obtaining a permanent URL.
    async fn upload_photo(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<PhotoUpload, OuvraError>;

    /// Create a report record referencing already-uploaded photo URLs.
    async fn create_report(&self, report: &ReportUpload) -> Result<ReportRecord, OuvraError>;
}
