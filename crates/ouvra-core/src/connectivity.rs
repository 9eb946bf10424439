// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable network reachability state.
//!
//! A single boolean owned by the producer side (the HTTP probe in
//! production, the test itself in tests) and broadcast to subscribers over
//! a `tokio::sync::watch` channel. Consumers receive a notification for
//! every published value, both edges included, and filter for the
//! transitions they care about.

use tokio::sync::watch;
use tracing::{info, warn};

/// Shared connectivity signal.
///
/// Cloning the link clones the producer handle; all clones feed the same
/// subscribers. Passed explicitly into the components that need it so tests
/// can simulate transitions deterministically.
#[derive(Debug, Clone)]
pub struct ConnectivityLink {
    tx: watch::Sender<bool>,
}

impl ConnectivityLink {
    /// Create a link seeded with the given reachability state.
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx }
    }

    /// Current reachability.
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Publish a reachability observation.
    ///
    /// Subscribers are notified on every publish, including repeats of the
    /// current value (a flapping or re-probed link fires repeatedly).
    pub fn set_online(&self, online: bool) {
        let was_online = *self.tx.borrow();
        if online != was_online {
            if online {
                info!("connectivity restored");
            } else {
                warn!("connectivity lost");
            }
        }
        self.tx.send_replace(online);
    }

    /// Subscribe to reachability changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityLink {
    /// A field device starts pessimistic: offline until the first probe.
    fn default() -> Self {
        Self::new(false)
    }
}
