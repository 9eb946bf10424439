// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! External collaborators (the remote REST API) are consumed through
//! `#[async_trait]` traits so the synchronization driver receives them as
//! injected dependencies and tests can substitute deterministic doubles.

pub mod remote;

pub use remote::RemoteApi;
