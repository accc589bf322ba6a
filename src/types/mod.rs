// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the watcher.
//!
//! # Types
//!
//! - [`Currency`] - Closed set of currency codes the feed reports
//! - [`Limit`] - Withdrawal limit for one currency
//! - [`Point`] / [`PointId`] - A cash-withdrawal location and its stable id
//! - [`Cluster`] / [`Snapshot`] - Grouped points as delivered by one poll
//! - [`SubscriberId`] - Numeric chat identity of a notification recipient

mod currency;
mod point;
mod subscriber_id;

pub use currency::Currency;
pub use point::{Cluster, Limit, Point, PointId, Snapshot};
pub use subscriber_id::SubscriberId;
