// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects all errors instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::OuvraConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &OuvraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level must be one of {LOG_LEVELS:?}, got `{}`",
                config.app.log_level
            ),
        });
    }

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("api.base_url must be an http(s) URL, got `{base_url}`"),
        });
    }

    if config.api.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.storage.photo_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.photo_dir must not be empty".to_string(),
        });
    }

    if config.sync.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "sync.max_attempts must be at least 1, got {}",
                config.sync.max_attempts
            ),
        });
    }

    if config.sync.retry_cap_secs < config.sync.retry_base_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "sync.retry_cap_secs ({}) must not be below sync.retry_base_secs ({})",
                config.sync.retry_cap_secs, config.sync.retry_base_secs
            ),
        });
    }

    if config.sync.probe_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.probe_interval_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
