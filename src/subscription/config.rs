// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-subscriber notification preferences.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Currency, Point};

/// Notification filter of one subscriber.
///
/// The filter maps a currency to a threshold amount. An empty filter accepts
/// every point, including points that report no limits at all. A non-empty
/// filter accepts a point when at least one of its limits has a configured
/// threshold and an amount at or below that threshold.
///
/// # Examples
///
/// ```
/// use atm_watch::subscription::SubscriptionConfig;
/// use atm_watch::types::{Currency, Limit, Point};
///
/// let config = SubscriptionConfig::accept_all().with_threshold(Currency::Usd, 100);
///
/// let cheap = Point::new("p1", "addr").with_limit(Limit::new(Currency::Usd, 80));
/// let pricey = Point::new("p2", "addr").with_limit(Limit::new(Currency::Usd, 150));
///
/// assert!(config.accepts(&cheap));
/// assert!(!config.accepts(&pricey));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    thresholds: BTreeMap<Currency, u64>,
}

impl SubscriptionConfig {
    /// Creates a config with no filter.
    #[must_use]
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Sets the threshold for a currency.
    #[must_use]
    pub fn with_threshold(mut self, currency: Currency, amount: u64) -> Self {
        self.thresholds.insert(currency, amount);
        self
    }

    /// Returns the threshold configured for a currency.
    #[must_use]
    pub fn threshold(&self, currency: Currency) -> Option<u64> {
        self.thresholds.get(&currency).copied()
    }

    /// Returns all configured thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &BTreeMap<Currency, u64> {
        &self.thresholds
    }

    /// Returns `true` if no filter is configured.
    #[must_use]
    pub fn is_accept_all(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Decides whether a point should be delivered to this subscriber.
    #[must_use]
    pub fn accepts(&self, point: &Point) -> bool {
        if self.is_accept_all() {
            return true;
        }

        point.limits().iter().any(|limit| {
            self.threshold(limit.currency)
                .is_some_and(|threshold| limit.amount <= threshold)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Limit;

    fn point(limits: &[(Currency, u64)]) -> Point {
        limits
            .iter()
            .fold(Point::new("p", "addr"), |p, (c, a)| {
                p.with_limit(Limit::new(*c, *a))
            })
    }

    #[test]
    fn accept_all_takes_everything() {
        let config = SubscriptionConfig::accept_all();
        assert!(config.is_accept_all());
        assert!(config.accepts(&point(&[])));
        assert!(config.accepts(&point(&[(Currency::Usd, 1_000_000)])));
    }

    #[test]
    fn usd_threshold_filter() {
        let config = SubscriptionConfig::accept_all().with_threshold(Currency::Usd, 100);

        assert!(config.accepts(&point(&[(Currency::Usd, 80)])));
        assert!(config.accepts(&point(&[(Currency::Usd, 80), (Currency::Eur, 50)])));
        assert!(!config.accepts(&point(&[(Currency::Usd, 150)])));
        assert!(!config.accepts(&point(&[(Currency::Eur, 10)])));
    }

    #[test]
    fn threshold_is_inclusive() {
        let config = SubscriptionConfig::accept_all().with_threshold(Currency::Rub, 500);
        assert!(config.accepts(&point(&[(Currency::Rub, 500)])));
        assert!(!config.accepts(&point(&[(Currency::Rub, 501)])));
    }

    #[test]
    fn any_qualifying_limit_is_enough() {
        let config = SubscriptionConfig::accept_all()
            .with_threshold(Currency::Usd, 100)
            .with_threshold(Currency::Eur, 100);

        assert!(config.accepts(&point(&[(Currency::Usd, 900), (Currency::Eur, 40)])));
    }

    #[test]
    fn filtered_config_rejects_point_without_limits() {
        let config = SubscriptionConfig::accept_all().with_threshold(Currency::Usd, 100);
        assert!(!config.accepts(&point(&[])));
    }

    #[test]
    fn with_threshold_overrides() {
        let config = SubscriptionConfig::accept_all()
            .with_threshold(Currency::Usd, 100)
            .with_threshold(Currency::Usd, 300);
        assert_eq!(config.threshold(Currency::Usd), Some(300));
        assert_eq!(config.thresholds().len(), 1);
    }
}
