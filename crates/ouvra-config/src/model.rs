// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized config
//! keys are rejected at startup with an actionable error message.

use serde::{Deserialize, Serialize};

/// Top-level Ouvra configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OuvraConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Remote REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Device-local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Offline queue replay settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name of the installation.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "ouvra".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token attached to every request. Optional for read-only use.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bearer_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.ouvra.app".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Device-local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory holding locally buffered photos.
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            photo_dir: default_photo_dir(),
        }
    }
}

fn default_database_path() -> String {
    "ouvra.db".to_string()
}

fn default_photo_dir() -> String {
    "photos".to_string()
}

/// Offline queue replay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Replay attempts before an action becomes terminally failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First retry delay in seconds; doubles per failure.
    #[serde(default = "default_retry_base_secs")]
    pub retry_base_secs: u64,

    /// Upper bound on the retry delay in seconds.
    #[serde(default = "default_retry_cap_secs")]
    pub retry_cap_secs: u64,

    /// Interval of the connectivity probe in seconds.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Delete locally buffered photos once their upload is acknowledged.
    #[serde(default)]
    pub purge_uploaded_photos: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_base_secs: default_retry_base_secs(),
            retry_cap_secs: default_retry_cap_secs(),
            probe_interval_secs: default_probe_interval_secs(),
            purge_uploaded_photos: false,
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_base_secs() -> u64 {
    30
}

fn default_retry_cap_secs() -> u64 {
    300
}

fn default_probe_interval_secs() -> u64 {
    15
}
