// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `atm_watch` - Notifies chat subscribers when new cash withdrawal points appear.
//!
//! The watcher polls a point feed on a fixed interval, keeps a short-term
//! memory of points it has already reported, and sends one message per
//! newly observed point to every subscriber whose filter accepts it.
//!
//! # Components
//!
//! - **Differ** ([`diff`]): detects points not seen in the recent past and
//!   forgets points absent for more than five cycles
//! - **Registry** ([`subscription`]): subscribers and their currency filters
//! - **Dispatcher** ([`dispatch`]): renders and delivers notifications
//! - **Collaborators**: the point feed ([`source`]) and the chat bot
//!   ([`transport`])
//!
//! # Quick Start
//!
//! ```no_run
//! use atm_watch::config::Config;
//! use atm_watch::source::{DEFAULT_CHANNEL_CAPACITY, spawn_poller};
//! use atm_watch::watcher::Watcher;
//!
//! #[tokio::main]
//! async fn main() -> atm_watch::Result<()> {
//!     let config = Config::from_env()?;
//!     let bot = config.telegram().into_client()?;
//!     bot.authenticate().await?;
//!
//!     let mut watcher = Watcher::new(bot.clone());
//!     let (signal_tx, signal_rx) = tokio::sync::mpsc::channel(64);
//!     watcher.spawn_signal_handler(signal_rx);
//!     tokio::spawn(async move { bot.run_updates(signal_tx).await });
//!
//!     let source = config.source().into_source()?;
//!     let snapshots = spawn_poller(source, config.poll_interval(), DEFAULT_CHANNEL_CAPACITY);
//!     watcher.run(snapshots).await;
//!     Ok(())
//! }
//! ```
//!
//! # Driving the pipeline by hand
//!
//! Any [`transport::Transport`] works; tests use an in-memory one.
//!
//! ```
//! use atm_watch::{DeliveryError, Point, Snapshot, SubscriberId};
//! use atm_watch::transport::Transport;
//! use atm_watch::watcher::Watcher;
//!
//! struct Stdout;
//!
//! impl Transport for Stdout {
//!     async fn deliver(&self, subscriber: SubscriberId, text: &str) -> Result<(), DeliveryError> {
//!         println!("to {subscriber}: {text}");
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut watcher = Watcher::new(Stdout);
//! watcher.registry().subscribe(SubscriberId::new(42));
//!
//! let snapshot = Snapshot::from_points(vec![Point::new("p1", "Nevsky 1")]);
//! let report = watcher.process(&snapshot).await;
//! assert_eq!(report.dispatch.delivered, 1);
//!
//! let report = watcher.process(&snapshot).await;
//! assert!(report.new_points.is_empty());
//! # });
//! ```

pub mod config;
pub mod diff;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod source;
pub mod subscription;
pub mod transport;
pub mod types;
pub mod watcher;

pub use diff::SnapshotDiffer;
pub use dispatch::{DispatchReport, NotificationDispatcher};
pub use error::{ConfigError, DeliveryError, Error, FetchError, Result, ValueError};
pub use event::{EventBus, WatchEvent};
pub use source::StateSource;
pub use subscription::{SubscriberRegistry, SubscriptionConfig};
pub use transport::{SignalKind, SubscriptionSignal, Transport};
pub use types::{Cluster, Currency, Limit, Point, PointId, Snapshot, SubscriberId};
pub use watcher::Watcher;
