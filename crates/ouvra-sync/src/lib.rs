// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline capture and reconnect-triggered synchronization for Ouvra.
//!
//! Two halves around the offline queue:
//!
//! - [`WriteRouter`] — the capture path: a write goes to the remote API when
//!   the device is online, into the durable queue otherwise.
//! - [`SyncDriver`] — the replay path: idles on the connectivity signal and
//!   drains the queue whenever reachability returns, replaying actions in
//!   enqueue order with per-item acknowledgment, retry, and backoff.

pub mod capture;
pub mod driver;

pub use capture::{Submission, WriteRouter};
pub use driver::{DrainSummary, SyncDriver};
