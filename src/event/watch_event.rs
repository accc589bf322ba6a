// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Watcher event types.

use crate::types::{PointId, SubscriberId};

/// Events emitted by the watcher.
///
/// These notify observers about subscriber changes, newly discovered points,
/// delivery failures, and completed cycles.
///
/// # Examples
///
/// ```
/// use atm_watch::event::WatchEvent;
/// use atm_watch::types::SubscriberId;
///
/// let added = WatchEvent::subscriber_added(SubscriberId::new(42));
/// assert!(added.is_subscriber_change());
/// assert_eq!(added.subscriber(), Some(SubscriberId::new(42)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A subscriber joined.
    SubscriberAdded {
        /// The new subscriber.
        subscriber: SubscriberId,
    },

    /// A subscriber left.
    SubscriberRemoved {
        /// The departed subscriber.
        subscriber: SubscriberId,
    },

    /// A point was observed for the first time (or after a long absence).
    PointDiscovered {
        /// The cycle it was discovered in.
        cycle: u64,
        /// The point identifier.
        point_id: PointId,
    },

    /// A notification could not be delivered.
    DeliveryFailed {
        /// The intended recipient.
        subscriber: SubscriberId,
        /// The point the notification was about.
        point_id: PointId,
        /// Error description.
        error: String,
    },

    /// A snapshot was fully processed.
    CycleCompleted {
        /// The cycle number.
        cycle: u64,
        /// Number of newly observed points.
        new_points: usize,
        /// Number of successful deliveries.
        delivered: usize,
        /// Number of failed deliveries.
        failed: usize,
    },
}

impl WatchEvent {
    /// Returns the subscriber this event concerns, if any.
    #[must_use]
    pub fn subscriber(&self) -> Option<SubscriberId> {
        match self {
            Self::SubscriberAdded { subscriber }
            | Self::SubscriberRemoved { subscriber }
            | Self::DeliveryFailed { subscriber, .. } => Some(*subscriber),
            Self::PointDiscovered { .. } | Self::CycleCompleted { .. } => None,
        }
    }

    /// Returns `true` if this is a subscriber added/removed event.
    #[must_use]
    pub fn is_subscriber_change(&self) -> bool {
        matches!(
            self,
            Self::SubscriberAdded { .. } | Self::SubscriberRemoved { .. }
        )
    }

    /// Creates a subscriber added event.
    #[must_use]
    pub fn subscriber_added(subscriber: SubscriberId) -> Self {
        Self::SubscriberAdded { subscriber }
    }

    /// Creates a subscriber removed event.
    #[must_use]
    pub fn subscriber_removed(subscriber: SubscriberId) -> Self {
        Self::SubscriberRemoved { subscriber }
    }

    /// Creates a delivery failed event.
    #[must_use]
    pub fn delivery_failed(
        subscriber: SubscriberId,
        point_id: PointId,
        error: impl Into<String>,
    ) -> Self {
        Self::DeliveryFailed {
            subscriber,
            point_id,
            error: error.into(),
        }
    }
}
