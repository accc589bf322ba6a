// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline wiring.
//!
//! Two tasks run for the lifetime of the process:
//!
//! - the pipeline ([`Watcher::run`]) waits for snapshots, diffs them and
//!   notifies matching subscribers;
//! - the signal handler ([`spawn_signal_handler`]) applies subscribe and
//!   unsubscribe requests to the shared [`SubscriberRegistry`](crate::subscription::SubscriberRegistry).
//!
//! They share nothing but the registry and the event bus.
//!
//! ```text
//! poller ──Snapshot──▶ Watcher ──reads──▶ SubscriberRegistry ◀──mutates── signal handler
//!                         │                                                  ▲
//!                         └──deliver──▶ Transport ──SubscriptionSignal───────┘
//! ```

mod pipeline;
mod signals;

pub use pipeline::{CycleReport, Watcher};
pub use signals::{apply_signal, spawn_signal_handler};
