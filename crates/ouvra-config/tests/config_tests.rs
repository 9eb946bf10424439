// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ouvra configuration system.

use ouvra_config::diagnostic::ConfigError;
use ouvra_config::model::OuvraConfig;
use ouvra_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_ouvra_config() {
    let toml = r#"
[app]
name = "tablette-chef-chantier"
log_level = "debug"

[api]
base_url = "https://backend.example.com"
bearer_token = "tok-123"
timeout_secs = 10

[storage]
database_path = "/tmp/ouvra-test.db"
photo_dir = "/tmp/ouvra-photos"

[sync]
max_attempts = 3
retry_base_secs = 5
retry_cap_secs = 60
probe_interval_secs = 30
purge_uploaded_photos = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "tablette-chef-chantier");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.api.base_url, "https://backend.example.com");
    assert_eq!(config.api.bearer_token.as_deref(), Some("tok-123"));
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.storage.database_path, "/tmp/ouvra-test.db");
    assert_eq!(config.storage.photo_dir, "/tmp/ouvra-photos");
    assert_eq!(config.sync.max_attempts, 3);
    assert_eq!(config.sync.retry_base_secs, 5);
    assert_eq!(config.sync.retry_cap_secs, 60);
    assert_eq!(config.sync.probe_interval_secs, 30);
    assert!(config.sync.purge_uploaded_photos);
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config should be valid");
    let defaults = OuvraConfig::default();
    assert_eq!(config.app.name, defaults.app.name);
    assert_eq!(config.api.base_url, defaults.api.base_url);
    assert_eq!(config.sync.max_attempts, 5);
    assert_eq!(config.sync.retry_base_secs, 30);
    assert_eq!(config.sync.retry_cap_secs, 300);
    assert!(!config.sync.purge_uploaded_photos);
}

/// Defaults pass validation.
#[test]
fn defaults_validate_cleanly() {
    load_and_validate_str("").expect("defaults should validate");
}

/// Unknown keys are rejected (deny_unknown_fields).
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[sync]
max_atempts = 3
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_atempts"),
        "error should mention the unknown key, got: {err_str}"
    );
}

/// A wrongly-typed value is rejected.
#[test]
fn type_mismatch_produces_error() {
    let toml = r#"
[sync]
max_attempts = "beaucoup"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Validation collects every failure instead of stopping at the first.
#[test]
fn validation_collects_all_errors() {
    let toml = r#"
[app]
log_level = "loud"

[api]
base_url = "ftp://backend"
timeout_secs = 0

[sync]
max_attempts = 0
retry_base_secs = 60
retry_cap_secs = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 4, "expected several errors, got {errors:?}");
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));

    let joined = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(joined.contains("app.log_level"));
    assert!(joined.contains("api.base_url"));
    assert!(joined.contains("sync.max_attempts"));
    assert!(joined.contains("sync.retry_cap_secs"));
}

/// Empty storage paths are rejected.
#[test]
fn empty_storage_paths_are_rejected() {
    let toml = r#"
[storage]
database_path = ""
photo_dir = "  "
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    let joined = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(joined.contains("storage.database_path"));
    assert!(joined.contains("storage.photo_dir"));
}

mod env_overrides {
    use super::*;
    use serial_test::serial;

    fn with_env(vars: &[(&str, &str)], f: impl FnOnce()) {
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }
        f();
        for (key, _) in vars {
            unsafe { std::env::remove_var(key) };
        }
    }

    /// `OUVRA_SECTION_KEY` maps to `section.key`, including keys that
    /// themselves contain underscores.
    #[test]
    #[serial]
    fn env_vars_override_toml_sections() {
        with_env(
            &[
                ("OUVRA_API_BASE_URL", "https://override.example.com"),
                ("OUVRA_SYNC_MAX_ATTEMPTS", "9"),
            ],
            || {
                let config = ouvra_config::load_config().expect("config should load");
                assert_eq!(config.api.base_url, "https://override.example.com");
                assert_eq!(config.sync.max_attempts, 9);
            },
        );
    }

    #[test]
    #[serial]
    fn without_env_vars_defaults_apply() {
        let config = ouvra_config::load_config().expect("config should load");
        assert_eq!(config.sync.max_attempts, 5);
    }
}
