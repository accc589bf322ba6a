// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cash-withdrawal points and the snapshots that carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Currency;

/// Stable identifier of a point, as assigned by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    /// Creates a point identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PointId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PointId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Withdrawal limit for one currency at a point.
///
/// The amount is a non-negative integer as reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Limit {
    /// The currency this limit applies to.
    pub currency: Currency,
    /// The amount available.
    pub amount: u64,
}

impl Limit {
    /// Creates a limit.
    #[must_use]
    pub const fn new(currency: Currency, amount: u64) -> Self {
        Self { currency, amount }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A single cash-withdrawal location.
///
/// A point carries at most one [`Limit`] per currency; [`Point::with_limit`]
/// replaces an existing limit for the same currency.
///
/// # Examples
///
/// ```
/// use atm_watch::types::{Currency, Limit, Point};
///
/// let point = Point::new("p1", "Nevsky pr. 1")
///     .with_limit(Limit::new(Currency::Usd, 50))
///     .with_limit(Limit::new(Currency::Usd, 80));
///
/// assert_eq!(point.limits().len(), 1);
/// assert_eq!(point.limit(Currency::Usd).map(|l| l.amount), Some(80));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    id: PointId,
    address: String,
    limits: Vec<Limit>,
}

impl Point {
    /// Creates a point without limits.
    #[must_use]
    pub fn new(id: impl Into<PointId>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            limits: Vec::new(),
        }
    }

    /// Adds a limit, replacing any limit already present for its currency.
    #[must_use]
    pub fn with_limit(mut self, limit: Limit) -> Self {
        match self.limits.iter_mut().find(|l| l.currency == limit.currency) {
            Some(existing) => *existing = limit,
            None => self.limits.push(limit),
        }
        self
    }

    /// Returns the point identifier.
    #[must_use]
    pub fn id(&self) -> &PointId {
        &self.id
    }

    /// Returns the physical address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the limits in feed order.
    #[must_use]
    pub fn limits(&self) -> &[Limit] {
        &self.limits
    }

    /// Returns the limit for a currency, if the point reports one.
    #[must_use]
    pub fn limit(&self, currency: Currency) -> Option<&Limit> {
        self.limits.iter().find(|l| l.currency == currency)
    }
}

/// A group of nearby points as delivered by the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    points: Vec<Point>,
}

impl Cluster {
    /// Creates a cluster.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Returns the points of this cluster.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// One complete poll result.
///
/// Snapshots replace each other wholesale; nothing is merged across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    clusters: Vec<Cluster>,
}

impl Snapshot {
    /// Creates a snapshot from clusters.
    #[must_use]
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Creates a snapshot holding a single cluster with the given points.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self::new(vec![Cluster::new(points)])
    }

    /// Returns the clusters in feed order.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Iterates over all points, flattened in traversal order.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.clusters.iter().flat_map(|c| c.points.iter())
    }

    /// Returns the total number of points across all clusters.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.clusters.iter().map(|c| c.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_limit_keeps_one_per_currency() {
        let point = Point::new("p1", "addr")
            .with_limit(Limit::new(Currency::Usd, 100))
            .with_limit(Limit::new(Currency::Eur, 50))
            .with_limit(Limit::new(Currency::Usd, 20));

        assert_eq!(
            point.limits(),
            &[Limit::new(Currency::Usd, 20), Limit::new(Currency::Eur, 50)]
        );
    }

    #[test]
    fn limit_lookup() {
        let point = Point::new("p1", "addr").with_limit(Limit::new(Currency::Rub, 1000));
        assert_eq!(point.limit(Currency::Rub).map(|l| l.amount), Some(1000));
        assert!(point.limit(Currency::Usd).is_none());
    }

    #[test]
    fn snapshot_flattens_in_order() {
        let snapshot = Snapshot::new(vec![
            Cluster::new(vec![Point::new("a", "1"), Point::new("b", "2")]),
            Cluster::default(),
            Cluster::new(vec![Point::new("c", "3")]),
        ]);

        let ids: Vec<&str> = snapshot.points().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(snapshot.point_count(), 3);
    }

    #[test]
    fn limit_display() {
        assert_eq!(Limit::new(Currency::Usd, 5000).to_string(), "5000 USD");
    }

    #[test]
    fn point_id_display() {
        assert_eq!(PointId::from("ATM-42").to_string(), "ATM-42");
    }
}
