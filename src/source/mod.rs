// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point feed collaborator.
//!
//! A [`StateSource`] produces one decoded [`Snapshot`] per fetch.
//! [`spawn_poller`] drives a source on a fixed interval and streams the
//! results to the pipeline over a channel.
//!
//! - [`HttpStateSource`]: the clusters endpoint over HTTP (requires the `http` feature)
//! - [`decode_snapshot`]: lenient decoding of the endpoint's JSON

#[cfg(feature = "http")]
mod http;
mod poller;
mod wire;

#[cfg(feature = "http")]
pub use http::{HttpStateSource, SourceConfig};
pub use poller::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_POLL_INTERVAL, spawn_poller};
pub use wire::{Bounds, GeoPoint, decode_snapshot};

use std::future::Future;

use crate::error::FetchError;
use crate::types::Snapshot;

/// Something that can produce the current set of points.
pub trait StateSource: Send + Sync {
    /// Fetches a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the snapshot cannot be retrieved or decoded.
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}
