// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of watcher events to observers.

use tokio::sync::broadcast;

use super::WatchEvent;

/// Events retained for an observer that has not caught up yet.
const BACKLOG: usize = 256;

/// Broadcasts [`WatchEvent`]s from the pipeline and the signal handler.
///
/// Publishing never blocks. An observer more than 256 events behind
/// sees `RecvError::Lagged` and resumes from the oldest retained event.
/// Clones share one channel.
///
/// ```
/// use atm_watch::event::{EventBus, WatchEvent};
/// use atm_watch::types::SubscriberId;
///
/// let bus = EventBus::new();
/// assert_eq!(bus.publish(WatchEvent::subscriber_added(SubscriberId::new(1))), 0);
///
/// let _rx = bus.subscribe();
/// assert_eq!(bus.publish(WatchEvent::subscriber_added(SubscriberId::new(2))), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WatchEvent>,
}

impl EventBus {
    /// Creates a bus with no observers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BACKLOG);
        Self { tx }
    }

    /// Registers an observer for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.tx.subscribe()
    }

    /// Publishes an event and returns how many observers it reached.
    pub fn publish(&self, event: WatchEvent) -> usize {
        match self.tx.send(event) {
            Ok(observers) => observers,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(?event, "No observers for event");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
