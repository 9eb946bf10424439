// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic connectivity probe.
//!
//! Production producer for the [`ConnectivityLink`]: a HEAD request against
//! the API base URL on a fixed interval. Any HTTP response proves the
//! network path; transport errors mean offline. Every observation is
//! published, so the link fires on repeats as well as on edges and the
//! consumers do the filtering. No debounce: a flapping connection fires the
//! sync driver repeatedly, which is harmless once the queue is drained.

use std::time::Duration;

use tracing::debug;

use ouvra_config::model::ApiConfig;
use ouvra_core::{ConnectivityLink, OuvraError};

/// Probes the backend and feeds the connectivity link.
pub struct ConnectivityProbe {
    client: reqwest::Client,
    url: String,
    interval: Duration,
    link: ConnectivityLink,
}

impl ConnectivityProbe {
    pub fn new(
        config: &ApiConfig,
        probe_interval_secs: u64,
        link: ConnectivityLink,
    ) -> Result<Self, OuvraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OuvraError::Api {
                message: format!("failed to build probe client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            url: config.base_url.trim_end_matches('/').to_string(),
            interval: Duration::from_secs(probe_interval_secs),
            link,
        })
    }

    /// Probe forever. Runs as its own task next to the sync driver.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            let online = self.check().await;
            debug!(online, "connectivity probe");
            self.link.set_online(online);
        }
    }

    /// Single reachability check.
    pub async fn check(&self) -> bool {
        self.client.head(&self.url).send().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            bearer_token: None,
            timeout_secs: 2,
        }
    }

    #[tokio::test]
    async fn reachable_backend_reads_as_online() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let link = ConnectivityLink::new(false);
        let probe = ConnectivityProbe::new(&probe_config(&server.uri()), 1, link.clone()).unwrap();
        assert!(probe.check().await);
    }

    #[tokio::test]
    async fn any_http_response_counts_as_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe = ConnectivityProbe::new(
            &probe_config(&server.uri()),
            1,
            ConnectivityLink::new(false),
        )
        .unwrap();
        // The backend answered, so the network path exists.
        assert!(probe.check().await);
    }

    #[tokio::test]
    async fn unreachable_backend_reads_as_offline() {
        // Nothing listens on this port.
        let probe = ConnectivityProbe::new(
            &probe_config("http://127.0.0.1:1"),
            1,
            ConnectivityLink::new(true),
        )
        .unwrap();
        assert!(!probe.check().await);
    }
}
