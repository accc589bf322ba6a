// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detection of points that are new since earlier snapshots.

use crate::types::{Point, Snapshot};

use super::SeenRegistry;

/// Number of cycles a point may be absent before it is forgotten.
pub const DEFAULT_STALENESS: u64 = 5;

/// Turns a stream of snapshots into the points that newly appeared.
///
/// Each call to [`process`](Self::process) is one cycle. A point is new when
/// its id is not tracked at the start of the scan. Ids absent for more than
/// the staleness threshold are evicted after the scan, so a point that comes
/// back after a long absence is announced again.
///
/// # Examples
///
/// ```
/// use atm_watch::diff::SnapshotDiffer;
/// use atm_watch::types::{Point, Snapshot};
///
/// let mut differ = SnapshotDiffer::new();
/// let snapshot = Snapshot::from_points(vec![Point::new("p1", "Main st. 1")]);
///
/// assert_eq!(differ.process(&snapshot).len(), 1);
/// assert!(differ.process(&snapshot).is_empty());
/// assert_eq!(differ.cycle(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotDiffer {
    seen: SeenRegistry,
    cycle: u64,
    staleness: u64,
}

impl SnapshotDiffer {
    /// Creates a differ with the default staleness threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_staleness(DEFAULT_STALENESS)
    }

    /// Creates a differ that forgets points absent for more than `staleness` cycles.
    #[must_use]
    pub fn with_staleness(staleness: u64) -> Self {
        Self {
            seen: SeenRegistry::new(),
            cycle: 0,
            staleness,
        }
    }

    /// Returns the number of the last processed cycle (0 before the first).
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns the staleness threshold in cycles.
    #[must_use]
    pub fn staleness(&self) -> u64 {
        self.staleness
    }

    /// Returns the last-seen registry.
    #[must_use]
    pub fn seen(&self) -> &SeenRegistry {
        &self.seen
    }

    /// Processes one snapshot and returns the newly observed points.
    ///
    /// Points are returned in snapshot traversal order. A duplicate id within
    /// the same snapshot is reported at most once.
    pub fn process(&mut self, snapshot: &Snapshot) -> Vec<Point> {
        self.cycle += 1;
        let cycle = self.cycle;

        let mut fresh = Vec::new();
        for point in snapshot.points() {
            if self.seen.mark(point.id(), cycle) {
                fresh.push(point.clone());
            }
        }

        // Eviction must follow the full scan.
        let evicted = self.seen.evict_stale(cycle, self.staleness);

        tracing::debug!(
            cycle,
            points = snapshot.point_count(),
            new = fresh.len(),
            evicted,
            tracked = self.seen.len(),
            "Processed snapshot"
        );

        fresh
    }
}

impl Default for SnapshotDiffer {
    fn default() -> Self {
        Self::new()
    }
}
