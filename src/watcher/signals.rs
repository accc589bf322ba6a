// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry mutation from inbound subscription signals.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event::{EventBus, WatchEvent};
use crate::subscription::SubscriberRegistry;
use crate::transport::{SignalKind, SubscriptionSignal};

/// Applies one signal to the registry.
///
/// Returns `true` if the registry changed. An event is published only for
/// actual changes.
pub fn apply_signal(
    registry: &SubscriberRegistry,
    event_bus: &EventBus,
    signal: &SubscriptionSignal,
) -> bool {
    let subscriber = signal.subscriber;
    let username = signal.username.as_deref().unwrap_or("-");

    match signal.kind {
        SignalKind::Subscribe => {
            let added = registry.subscribe(subscriber);
            if added {
                tracing::info!(%subscriber, username, "New subscriber");
                event_bus.publish(WatchEvent::subscriber_added(subscriber));
            } else {
                tracing::debug!(%subscriber, username, "Already subscribed");
            }
            added
        }
        SignalKind::Unsubscribe => {
            let removed = registry.unsubscribe(subscriber);
            if removed {
                tracing::info!(%subscriber, username, "Subscriber left");
                event_bus.publish(WatchEvent::subscriber_removed(subscriber));
            } else {
                tracing::debug!(%subscriber, username, "Unsubscribe from unknown subscriber");
            }
            removed
        }
    }
}

/// Spawns the task that serially applies inbound signals to the registry.
///
/// The task ends when every sender of `signals` is dropped.
pub fn spawn_signal_handler(
    registry: Arc<SubscriberRegistry>,
    event_bus: EventBus,
    mut signals: mpsc::Receiver<SubscriptionSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Starting subscription signal handler");

        while let Some(signal) = signals.recv().await {
            apply_signal(&registry, &event_bus, &signal);
        }

        tracing::debug!("Subscription signal handler stopped");
    })
}
