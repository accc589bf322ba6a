// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-seen bookkeeping for point identifiers.

use std::collections::HashMap;

use crate::types::PointId;

/// Maps each recently observed point id to the cycle it was last seen in.
///
/// Owned by the pipeline task; it is plain data with no interior locking.
#[derive(Debug, Default, Clone)]
pub struct SeenRegistry {
    last_seen: HashMap<PointId, u64>,
}

impl SeenRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id is currently tracked.
    #[must_use]
    pub fn contains(&self, id: &PointId) -> bool {
        self.last_seen.contains_key(id)
    }

    /// Returns the cycle the id was last seen in.
    #[must_use]
    pub fn last_seen(&self, id: &PointId) -> Option<u64> {
        self.last_seen.get(id).copied()
    }

    /// Records that `id` was seen in `cycle`.
    ///
    /// Returns `true` if the id was not tracked before this call.
    pub fn mark(&mut self, id: &PointId, cycle: u64) -> bool {
        if let Some(last) = self.last_seen.get_mut(id) {
            *last = cycle;
            false
        } else {
            self.last_seen.insert(id.clone(), cycle);
            true
        }
    }

    /// Drops every id whose last sighting lags `cycle` by more than `threshold`.
    ///
    /// Returns the number of evicted ids.
    pub fn evict_stale(&mut self, cycle: u64, threshold: u64) -> usize {
        let before = self.last_seen.len();
        self.last_seen
            .retain(|_, last| cycle.saturating_sub(*last) <= threshold);
        before - self.last_seen.len()
    }

    /// Returns the number of tracked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    /// Returns `true` if no ids are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
