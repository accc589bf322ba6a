// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The diff and dispatch pipeline.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::diff::SnapshotDiffer;
use crate::dispatch::{DispatchReport, NotificationDispatcher};
use crate::event::{EventBus, WatchEvent};
use crate::subscription::SubscriberRegistry;
use crate::transport::{SubscriptionSignal, Transport};
use crate::types::{Point, Snapshot};

use super::signals::spawn_signal_handler;

/// Outcome of processing one snapshot.
#[derive(Debug)]
pub struct CycleReport {
    /// The cycle number.
    pub cycle: u64,
    /// Points observed for the first time in this cycle, in snapshot order.
    pub new_points: Vec<Point>,
    /// Delivery outcome for the new points.
    pub dispatch: DispatchReport,
}

/// Runs snapshots through the differ and notifies subscribers.
///
/// The watcher owns the [`SnapshotDiffer`] (and with it the seen-point
/// history) and shares the [`SubscriberRegistry`] with the signal handler
/// task. Registry reads take a copy, so no lock is held while sending.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use atm_watch::source::{SourceConfig, spawn_poller};
/// use atm_watch::transport::TelegramConfig;
/// use atm_watch::watcher::Watcher;
///
/// # async fn example() -> atm_watch::Result<()> {
/// let bot = TelegramConfig::new("token").into_client()?;
/// let mut watcher = Watcher::new(bot.clone());
///
/// let (signal_tx, signal_rx) = tokio::sync::mpsc::channel(64);
/// watcher.spawn_signal_handler(signal_rx);
/// tokio::spawn(async move { bot.run_updates(signal_tx).await });
///
/// let snapshots = spawn_poller(SourceConfig::default().into_source()?, Duration::from_secs(60), 4);
/// watcher.run(snapshots).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Watcher<T> {
    differ: SnapshotDiffer,
    registry: Arc<SubscriberRegistry>,
    dispatcher: NotificationDispatcher<T>,
    event_bus: EventBus,
}

impl<T: Transport> Watcher<T> {
    /// Creates a watcher with an empty registry and no seen points.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            differ: SnapshotDiffer::new(),
            registry: Arc::new(SubscriberRegistry::new()),
            dispatcher: NotificationDispatcher::new(transport),
            event_bus: EventBus::new(),
        }
    }

    /// Uses an existing registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<SubscriberRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Uses a custom staleness threshold for the seen-point history.
    #[must_use]
    pub fn with_staleness(mut self, staleness: u64) -> Self {
        self.differ = SnapshotDiffer::with_staleness(staleness);
        self
    }

    /// Uses an existing event bus.
    #[must_use]
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    /// Returns a handle to the subscriber registry.
    #[must_use]
    pub fn registry(&self) -> Arc<SubscriberRegistry> {
        Arc::clone(&self.registry)
    }

    /// Returns the differ.
    #[must_use]
    pub fn differ(&self) -> &SnapshotDiffer {
        &self.differ
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &NotificationDispatcher<T> {
        &self.dispatcher
    }

    /// Subscribes to watcher events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.event_bus.subscribe()
    }

    /// Spawns the task that applies subscription signals to this watcher's registry.
    pub fn spawn_signal_handler(
        &self,
        signals: mpsc::Receiver<SubscriptionSignal>,
    ) -> JoinHandle<()> {
        spawn_signal_handler(self.registry(), self.event_bus.clone(), signals)
    }

    /// Processes one snapshot: diff, then notify.
    ///
    /// Points are marked seen whether or not their notifications succeed.
    pub async fn process(&mut self, snapshot: &Snapshot) -> CycleReport {
        let new_points = self.differ.process(snapshot);
        let cycle = self.differ.cycle();

        for point in &new_points {
            tracing::info!(cycle, point = %point.id(), address = %point.address(), "New point observed");
            self.event_bus.publish(WatchEvent::PointDiscovered {
                cycle,
                point_id: point.id().clone(),
            });
        }

        let dispatch = if new_points.is_empty() {
            DispatchReport::default()
        } else {
            let subscribers = self.registry.snapshot_for_read();
            self.dispatcher.dispatch(&new_points, &subscribers).await
        };

        for failure in &dispatch.failures {
            self.event_bus.publish(WatchEvent::delivery_failed(
                failure.subscriber,
                failure.point_id.clone(),
                failure.error.to_string(),
            ));
        }

        self.event_bus.publish(WatchEvent::CycleCompleted {
            cycle,
            new_points: new_points.len(),
            delivered: dispatch.delivered,
            failed: dispatch.failures.len(),
        });

        CycleReport {
            cycle,
            new_points,
            dispatch,
        }
    }

    /// Processes snapshots until the stream ends.
    pub async fn run(&mut self, mut snapshots: mpsc::Receiver<Snapshot>) {
        tracing::info!("Watching for new points");

        while let Some(snapshot) = snapshots.recv().await {
            let report = self.process(&snapshot).await;
            if !report.new_points.is_empty() {
                tracing::info!(
                    cycle = report.cycle,
                    new = report.new_points.len(),
                    delivered = report.dispatch.delivered,
                    failed = report.dispatch.failures.len(),
                    "Cycle completed"
                );
            }
        }

        tracing::info!("Snapshot stream closed");
    }
}
