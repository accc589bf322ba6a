// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriber bookkeeping.
//!
//! # Overview
//!
//! - [`SubscriberRegistry`] - Lock-guarded map of subscribers, mutated by the
//!   inbound signal task and read by the notification pipeline
//! - [`SubscriptionConfig`] - Per-subscriber currency/amount filter
//!
//! # Usage
//!
//! ```
//! use atm_watch::subscription::{SubscriberRegistry, SubscriptionConfig};
//! use atm_watch::types::{Currency, SubscriberId};
//!
//! let registry = SubscriberRegistry::new();
//! let id = SubscriberId::new(42);
//!
//! registry.subscribe(id);
//! registry.configure(id, SubscriptionConfig::accept_all().with_threshold(Currency::Usd, 100));
//!
//! for (subscriber, config) in registry.snapshot_for_read() {
//!     println!("{subscriber}: {:?}", config.thresholds());
//! }
//! ```

mod config;
mod registry;

pub use config::SubscriptionConfig;
pub use registry::SubscriberRegistry;
