// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer events.
//!
//! The watcher publishes [`WatchEvent`]s on an [`EventBus`] so that callers
//! can follow subscriber changes, discoveries and delivery outcomes without
//! reaching into pipeline state.
//!
//! # Examples
//!
//! ```no_run
//! use atm_watch::event::{EventBus, WatchEvent};
//!
//! # async fn example(bus: EventBus) {
//! let mut rx = bus.subscribe();
//!
//! while let Ok(event) = rx.recv().await {
//!     if let WatchEvent::DeliveryFailed { subscriber, point_id, error } = event {
//!         eprintln!("{subscriber} missed {point_id}: {error}");
//!     }
//! }
//! # }
//! ```

mod event_bus;
mod watch_event;

pub use event_bus::EventBus;
pub use watch_event::WatchEvent;
