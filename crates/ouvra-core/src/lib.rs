// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ouvra field-operations sync core.
//!
//! This crate provides the foundational types shared across the Ouvra
//! workspace: the error type, the offline action model, and the trait for
//! the remote API collaborator.

pub mod connectivity;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use connectivity::ConnectivityLink;
pub use error::OuvraError;
pub use traits::RemoteApi;
pub use types::{
    ActionId, ActionKind, OfflineAction, PhotoRef, PhotoUpload, ReportDraft, ReportRecord,
    ReportUpload, SiteDraft, SiteRecord,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_serializes_with_wire_tags() {
        let site = ActionKind::CreateSite {
            site: SiteDraft::named("Site A"),
        };
        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json["type"], "CREATE_SITE");
        assert_eq!(json["site"]["nom"], "Site A");

        let report = ActionKind::CreateReportWithPhoto {
            report: ReportDraft {
                chantier_id: Some("ch-12".into()),
                titre: "Fissure dalle".into(),
                description: "Fissure constatée au niveau R+1".into(),
                categorie: Some("incident".into()),
            },
            photos: vec![PhotoRef("offline_photo_1.jpg".into())],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "CREATE_REPORT_WITH_PHOTO");
        assert_eq!(json["photos"][0], "offline_photo_1.jpg");
    }

    #[test]
    fn action_kind_round_trips() {
        let kind = ActionKind::CreateReportWithPhoto {
            report: ReportDraft {
                chantier_id: None,
                titre: "Livraison".into(),
                description: "Réception ferraillage".into(),
                categorie: None,
            },
            photos: vec![
                PhotoRef("a.jpg".into()),
                PhotoRef("b.jpg".into()),
            ],
        };
        let json = serde_json::to_string(&kind).unwrap();
        let back: ActionKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, back);
    }

    #[test]
    fn action_ids_are_unique() {
        let a = ActionId::fresh();
        let b = ActionId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn report_upload_flattens_draft_fields() {
        let upload = ReportUpload {
            report: ReportDraft {
                chantier_id: Some("ch-3".into()),
                titre: "Contrôle".into(),
                description: "RAS".into(),
                categorie: None,
            },
            photo_urls: vec!["https://cdn.example/p.jpg".into()],
        };
        let json = serde_json::to_value(&upload).unwrap();
        // Flattened: the backend sees one flat object, not a nested draft.
        assert_eq!(json["titre"], "Contrôle");
        assert_eq!(json["photo_urls"][0], "https://cdn.example/p.jpg");
    }

    #[test]
    fn api_errors_are_retryable_local_photo_errors_are_not() {
        let api = OuvraError::Api {
            message: "HTTP 503".into(),
            source: None,
        };
        let photo = OuvraError::Photo {
            message: "missing file".into(),
            source: None,
        };
        assert!(api.is_retryable());
        assert!(!photo.is_retryable());
    }
}
