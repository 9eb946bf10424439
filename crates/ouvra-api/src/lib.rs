// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ouvra backend REST API.
//!
//! The wire payload and result types live in `ouvra-core` (they are shared
//! with the test doubles); this crate contributes the reqwest-backed
//! [`HttpRemoteApi`] implementation of the [`ouvra_core::RemoteApi`] trait.

pub mod client;
pub mod probe;

pub use client::HttpRemoteApi;
pub use probe::ConnectivityProbe;
