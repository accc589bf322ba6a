// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot diffing.
//!
//! The [`SnapshotDiffer`] consumes snapshots one cycle at a time and yields
//! the points that were not visible recently. Its [`SeenRegistry`] remembers
//! the cycle each point id was last observed in.

mod seen_registry;
mod snapshot_differ;

pub use seen_registry::SeenRegistry;
pub use snapshot_differ::{DEFAULT_STALENESS, SnapshotDiffer};
