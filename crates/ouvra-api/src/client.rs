// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ouvra backend REST API.
//!
//! Implements [`RemoteApi`] over three endpoints: `POST /chantiers`,
//! `POST /photos` (raw bytes, returns the permanent URL), and
//! `POST /rapports`. The bearer token is attached as a default header at
//! construction.
//!
//! No internal retry: attempts and backoff belong to the offline queue, so
//! a second retry layer here would double-count failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use ouvra_config::model::ApiConfig;
use ouvra_core::{
    OuvraError, PhotoUpload, RemoteApi, ReportRecord, ReportUpload, SiteDraft, SiteRecord,
};

/// HTTP implementation of the remote API collaborator.
#[derive(Debug, Clone)]
pub struct HttpRemoteApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteApi {
    /// Build a client from the `[api]` configuration section.
    pub fn new(config: &ApiConfig) -> Result<Self, OuvraError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| OuvraError::Config(format!("invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OuvraError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn create_site(&self, site: &SiteDraft) -> Result<SiteRecord, OuvraError> {
        let response = self
            .client
            .post(self.url("/chantiers"))
            .json(site)
            .send()
            .await
            .map_err(send_err)?;
        debug!(status = %response.status(), "create-site response received");
        expect_json(response, "create-site").await
    }

    async fn upload_photo(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<PhotoUpload, OuvraError> {
        let response = self
            .client
            .post(self.url("/photos"))
            .query(&[("filename", filename)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(send_err)?;
        debug!(status = %response.status(), filename, "upload-photo response received");
        expect_json(response, "upload-photo").await
    }

    async fn create_report(&self, report: &ReportUpload) -> Result<ReportRecord, OuvraError> {
        let response = self
            .client
            .post(self.url("/rapports"))
            .json(report)
            .send()
            .await
            .map_err(send_err)?;
        debug!(status = %response.status(), "create-report response received");
        expect_json(response, "create-report").await
    }
}

fn send_err(e: reqwest::Error) -> OuvraError {
    OuvraError::Api {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Map a response to its JSON payload, or a status-tagged error.
async fn expect_json<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, OuvraError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OuvraError::Api {
            message: format!("{what} returned HTTP {status}: {body}"),
            source: None,
        });
    }
    response.json::<T>().await.map_err(|e| OuvraError::Api {
        message: format!("failed to parse {what} response: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ouvra_core::ReportDraft;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str, token: Option<&str>) -> HttpRemoteApi {
        let config = ApiConfig {
            base_url: "https://placeholder.invalid".into(),
            bearer_token: token.map(String::from),
            timeout_secs: 5,
        };
        HttpRemoteApi::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn create_site_posts_draft_and_parses_record() {
        let server = MockServer::start().await;
        let draft = SiteDraft::named("Site A");

        Mock::given(method("POST"))
            .and(path("/chantiers"))
            .and(body_json(&draft))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "ch-1",
                "nom": "Site A"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let record = client.create_site(&draft).await.unwrap();
        assert_eq!(record.id, "ch-1");
        assert_eq!(record.nom, "Site A");
    }

    #[tokio::test]
    async fn upload_photo_sends_raw_bytes_and_returns_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/photos"))
            .and(query_param("filename", "p.jpg"))
            .and(header("content-type", "application/octet-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://cdn.example/p.jpg"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let upload = client.upload_photo(b"jpegdata".to_vec(), "p.jpg").await.unwrap();
        assert_eq!(upload.url, "https://cdn.example/p.jpg");
    }

    #[tokio::test]
    async fn create_report_posts_flattened_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rapports"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "rp-1",
                "titre": "Fissure"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let record = client
            .create_report(&ReportUpload {
                report: ReportDraft {
                    chantier_id: Some("ch-1".into()),
                    titre: "Fissure".into(),
                    description: "Fissure au R+1".into(),
                    categorie: None,
                },
                photo_urls: vec!["https://cdn.example/p.jpg".into()],
            })
            .await
            .unwrap();
        assert_eq!(record.id, "rp-1");
    }

    #[tokio::test]
    async fn bearer_token_is_attached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chantiers"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "ch-1",
                "nom": "Site A"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Some("tok-123"));
        let result = client.create_site(&SiteDraft::named("Site A")).await;
        assert!(result.is_ok(), "auth header should match: {result:?}");
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error_with_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chantiers"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let err = client
            .create_site(&SiteDraft::named("Site A"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        let msg = err.to_string();
        assert!(msg.contains("503"), "got: {msg}");
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rapports"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let err = client
            .create_report(&ReportUpload {
                report: ReportDraft {
                    chantier_id: None,
                    titre: "x".into(),
                    description: "y".into(),
                    categorie: None,
                },
                photo_urls: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse"), "got: {err}");
    }
}
