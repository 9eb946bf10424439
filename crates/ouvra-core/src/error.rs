// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ouvra sync core.

use thiserror::Error;

/// The primary error type used across Ouvra crates.
#[derive(Debug, Error)]
pub enum OuvraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote API errors (network failure, non-2xx status, malformed response).
    #[error("remote API error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Photo file area errors (write, read, or delete of a locally buffered photo).
    #[error("photo store error: {message}")]
    Photo {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OuvraError {
    /// True when the error class is worth retrying on a later drain pass.
    ///
    /// Remote failures are transient until proven otherwise; local photo
    /// errors are not, because a missing file will not reappear.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OuvraError::Api { .. })
    }
}
