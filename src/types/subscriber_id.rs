// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriber identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a notification recipient.
///
/// This wraps the numeric chat identifier used by the bot transport. Group
/// chats use negative identifiers, so the value is signed.
///
/// # Examples
///
/// ```
/// use atm_watch::types::SubscriberId;
///
/// let id = SubscriberId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(i64);

impl SubscriberId {
    /// Creates a subscriber identifier from a chat id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw chat id.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SubscriberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_ids_are_valid() {
        let id = SubscriberId::from(-100_123);
        assert_eq!(id.value(), -100_123);
        assert_eq!(id.to_string(), "-100123");
    }

    #[test]
    fn hashable() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(SubscriberId::new(7));
        assert!(set.contains(&SubscriberId::new(7)));
        assert!(!set.contains(&SubscriberId::new(8)));
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&SubscriberId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
