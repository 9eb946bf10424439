// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./ouvra.toml` > `~/.config/ouvra/ouvra.toml`
//! > `/etc/ouvra/ouvra.toml`, with environment variable overrides via the
//! `OUVRA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::OuvraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ouvra/ouvra.toml` (system-wide)
/// 3. `~/.config/ouvra/ouvra.toml` (user XDG config)
/// 4. `./ouvra.toml` (local directory)
/// 5. `OUVRA_*` environment variables
pub fn load_config() -> Result<OuvraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OuvraConfig::default()))
        .merge(Toml::file("/etc/ouvra/ouvra.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ouvra/ouvra.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ouvra.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<OuvraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OuvraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OuvraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OuvraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `OUVRA_SYNC_MAX_ATTEMPTS` must map to
/// `sync.max_attempts`, not `sync.max.attempts`.
fn env_provider() -> Env {
    Env::prefixed("OUVRA_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. OUVRA_API_BASE_URL -> "api_base_url".
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("api_", "api.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}
