// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ouvra integration tests.
//!
//! Provides deterministic, CI-runnable doubles for the sync stack's
//! collaborators, without external services.
//!
//! # Components
//!
//! - [`RecordingRemote`] — remote API double with an ordered call log and
//!   scriptable failures
//! - [`SyncHarness`] — temp-storage assembly of queue, router, and driver

pub mod harness;
pub mod mock_remote;

pub use harness::SyncHarness;
pub use mock_remote::{RecordingRemote, RemoteCall};
