// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification text.

use crate::types::Point;

/// Renders the plain-text notification for a newly observed point.
///
/// # Examples
///
/// ```
/// use atm_watch::dispatch::render_notification;
/// use atm_watch::types::{Currency, Limit, Point};
///
/// let point = Point::new("p1", "Nevsky pr. 1").with_limit(Limit::new(Currency::Usd, 5000));
/// assert_eq!(
///     render_notification(&point),
///     "New ATM\nAddress: Nevsky pr. 1\nAvailable: 5000 USD"
/// );
/// ```
#[must_use]
pub fn render_notification(point: &Point) -> String {
    let available = if point.limits().is_empty() {
        "no limits reported".to_string()
    } else {
        point
            .limits()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "New ATM\nAddress: {}\nAvailable: {available}",
        point.address()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, Limit};

    #[test]
    fn lists_limits_in_order() {
        let point = Point::new("p", "Liteyny 2")
            .with_limit(Limit::new(Currency::Eur, 300))
            .with_limit(Limit::new(Currency::Usd, 1200));

        assert_eq!(
            render_notification(&point),
            "New ATM\nAddress: Liteyny 2\nAvailable: 300 EUR, 1200 USD"
        );
    }

    #[test]
    fn point_without_limits() {
        let point = Point::new("p", "Sadovaya 5");
        assert_eq!(
            render_notification(&point),
            "New ATM\nAddress: Sadovaya 5\nAvailable: no limits reported"
        );
    }
}
