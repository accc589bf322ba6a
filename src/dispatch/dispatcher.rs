// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of new points to matching subscribers.

use crate::error::DeliveryError;
use crate::subscription::SubscriptionConfig;
use crate::transport::Transport;
use crate::types::{Point, PointId, SubscriberId};

use super::render_notification;

/// A delivery that did not go through.
#[derive(Debug)]
pub struct DeliveryFailure {
    /// The intended recipient.
    pub subscriber: SubscriberId,
    /// The point the notification was about.
    pub point_id: PointId,
    /// What went wrong.
    pub error: DeliveryError,
}

/// Outcome of one dispatch call.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Number of successful deliveries.
    pub delivered: usize,
    /// Number of (point, subscriber) pairs rejected by the subscriber's filter.
    pub filtered: usize,
    /// Deliveries that failed.
    pub failures: Vec<DeliveryFailure>,
}

impl DispatchReport {
    /// Returns the number of delivery attempts made.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

/// Sends one notification per matching (point, subscriber) pair.
///
/// Deliveries run sequentially. A failed delivery is logged and recorded in
/// the [`DispatchReport`]; it never stops the remaining deliveries.
///
/// # Examples
///
/// ```no_run
/// use atm_watch::dispatch::NotificationDispatcher;
/// use atm_watch::subscription::SubscriberRegistry;
/// use atm_watch::transport::TelegramConfig;
/// use atm_watch::types::Point;
///
/// # async fn example(points: Vec<Point>, registry: SubscriberRegistry) -> atm_watch::Result<()> {
/// let dispatcher = NotificationDispatcher::new(TelegramConfig::new("token").into_client()?);
/// let report = dispatcher.dispatch(&points, &registry.snapshot_for_read()).await;
/// println!("{} delivered, {} failed", report.delivered, report.failures.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NotificationDispatcher<T> {
    transport: T,
}

impl<T: Transport> NotificationDispatcher<T> {
    /// Creates a dispatcher sending through `transport`.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Notifies every accepting subscriber about every point.
    ///
    /// Points are handled in the given order.
    pub async fn dispatch(
        &self,
        points: &[Point],
        subscribers: &[(SubscriberId, SubscriptionConfig)],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for point in points {
            let text = render_notification(point);

            for (subscriber, config) in subscribers {
                if !config.accepts(point) {
                    report.filtered += 1;
                    continue;
                }

                match self.transport.deliver(*subscriber, &text).await {
                    Ok(()) => {
                        tracing::debug!(subscriber = %subscriber, point = %point.id(), "Delivered notification");
                        report.delivered += 1;
                    }
                    Err(error) => {
                        tracing::warn!(
                            subscriber = %subscriber,
                            point = %point.id(),
                            error = %error,
                            "Failed to deliver notification"
                        );
                        report.failures.push(DeliveryFailure {
                            subscriber: *subscriber,
                            point_id: point.id().clone(),
                            error,
                        });
                    }
                }
            }
        }

        report
    }
}
