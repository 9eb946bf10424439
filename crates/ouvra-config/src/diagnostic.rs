// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error diagnostics.
//!
//! Figment deserialization errors are converted into miette diagnostics so
//! startup failures render with error codes and help text instead of a raw
//! serde message.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error ready for diagnostic rendering.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration could not be deserialized (unknown key, type
    /// mismatch, malformed TOML).
    #[error("{message}")]
    #[diagnostic(
        code(ouvra::config::invalid),
        help("check ouvra.toml against the documented sections: [app], [api], [storage], [sync]")
    )]
    Invalid { message: String },

    /// The configuration deserialized but a value is semantically invalid.
    #[error("{message}")]
    #[diagnostic(code(ouvra::config::validation))]
    Validation { message: String },
}

/// Convert a figment error (which may aggregate several failures) into
/// individual diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
        .collect()
}

/// Render collected errors to stderr via miette.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }
}
