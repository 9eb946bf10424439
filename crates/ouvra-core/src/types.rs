// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for offline actions and remote payloads.
//!
//! Field names on the draft payloads follow the backend's French contract
//! (`nom`, `adresse`, ...) so a queued action serializes to exactly the
//! JSON the remote API expects.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a queued offline action.
///
/// Generated locally at enqueue time, never server-assigned, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    /// Mint a fresh identifier (UUID v4).
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filename of a locally buffered photo inside the device photo area.
///
/// Written synchronously at capture time so the in-memory bytes do not have
/// to survive a process restart; read once during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef(pub String);

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field values for a site (chantier) creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDraft {
    pub nom: String,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default)]
    pub ville: Option<String>,
    #[serde(default)]
    pub code_postal: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub date_debut: Option<String>,
}

impl SiteDraft {
    /// Minimal draft carrying only the site name.
    pub fn named(nom: impl Into<String>) -> Self {
        Self {
            nom: nom.into(),
            adresse: None,
            ville: None,
            code_postal: None,
            client: None,
            date_debut: None,
        }
    }
}

/// Field values for an incident/observation report.
///
/// `chantier_id` stays optional: a report captured offline against a site
/// that was itself created offline carries no server-side id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    #[serde(default)]
    pub chantier_id: Option<String>,
    pub titre: String,
    pub description: String,
    #[serde(default)]
    pub categorie: Option<String>,
}

/// A queued mutation, tagged by action type.
///
/// Closed set, decoded exhaustively by the replay dispatcher. The serialized
/// tag is the wire-stable action name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    CreateSite {
        site: SiteDraft,
    },
    CreateReportWithPhoto {
        report: ReportDraft,
        photos: Vec<PhotoRef>,
    },
}

impl ActionKind {
    /// Stable tag used for queue bookkeeping and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            ActionKind::CreateSite { .. } => "CREATE_SITE",
            ActionKind::CreateReportWithPhoto { .. } => "CREATE_REPORT_WITH_PHOTO",
        }
    }
}

/// A captured mutation awaiting replay against the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineAction {
    pub id: ActionId,
    #[serde(flatten)]
    pub kind: ActionKind,
    /// Capture timestamp, advisory only: replay order is append order.
    pub enqueued_at: DateTime<Utc>,
}

// --- Remote result payloads ---

/// Site record returned by the remote create-site endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,
    pub nom: String,
}

/// Report record returned by the remote create-report endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    pub titre: String,
}

/// Permanent URL handed back by the photo upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoUpload {
    pub url: String,
}

/// Report payload submitted after its photos have been uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUpload {
    #[serde(flatten)]
    pub report: ReportDraft,
    pub photo_urls: Vec<String>,
}
