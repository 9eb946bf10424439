// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Ouvra field-operations sync core.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, the durable
//! offline action queue, the device photo file area, and the
//! last-write-wins snapshot cache.

pub mod cache;
pub mod database;
pub mod migrations;
pub mod models;
pub mod photos;
pub mod queue;

pub use database::Database;
pub use models::{ActionStatus, QueueCounts, QueueEntry};
pub use photos::PhotoStore;
pub use queue::BackoffPolicy;
