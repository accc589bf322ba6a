// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of subscribers and their preferences.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::SubscriberId;

use super::SubscriptionConfig;

/// Thread-safe map from subscriber identity to [`SubscriptionConfig`].
///
/// The registry owns every config. Readers get a cloned point-in-time view
/// from [`snapshot_for_read`](Self::snapshot_for_read), so no lock is held
/// while notifications are sent. Writes replace whole entries under the
/// write lock; a reader never sees a half-built entry.
///
/// # Examples
///
/// ```
/// use atm_watch::subscription::SubscriberRegistry;
/// use atm_watch::types::SubscriberId;
///
/// let registry = SubscriberRegistry::new();
/// let id = SubscriberId::new(42);
///
/// assert!(registry.subscribe(id));
/// assert!(!registry.subscribe(id));
/// assert_eq!(registry.len(), 1);
///
/// assert!(registry.unsubscribe(id));
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, SubscriptionConfig>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber with an accept-all config.
    ///
    /// An existing subscriber keeps its config. Returns `true` if the
    /// subscriber was added by this call.
    pub fn subscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        if subscribers.contains_key(&id) {
            return false;
        }
        subscribers.insert(id, SubscriptionConfig::accept_all());
        true
    }

    /// Removes a subscriber.
    ///
    /// Returns `true` if the subscriber was present.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.write().remove(&id).is_some()
    }

    /// Replaces the config of an existing subscriber.
    ///
    /// Returns `false` and changes nothing if the subscriber is unknown.
    pub fn configure(&self, id: SubscriberId, config: SubscriptionConfig) -> bool {
        match self.subscribers.write().get_mut(&id) {
            Some(existing) => {
                *existing = config;
                true
            }
            None => false,
        }
    }

    /// Returns a copy of all entries, in no particular order.
    #[must_use]
    pub fn snapshot_for_read(&self) -> Vec<(SubscriberId, SubscriptionConfig)> {
        self.subscribers
            .read()
            .iter()
            .map(|(id, config)| (*id, config.clone()))
            .collect()
    }

    /// Returns `true` if the subscriber is registered.
    #[must_use]
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.read().contains_key(&id)
    }

    /// Returns the number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Returns `true` if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }
}
