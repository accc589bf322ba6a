// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the ATM watcher.
//!
//! Failures are split by where they originate: fetching snapshots from the
//! upstream point feed, delivering notifications through the bot transport,
//! loading configuration, and validating values.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Fetching a snapshot from the point feed failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Delivering a message through the transport failed.
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// The process configuration is incomplete or invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A currency code outside the supported set.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Errors raised while retrieving a snapshot from the point feed.
///
/// A fetch error skips the current cycle; it is never fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("unexpected status {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// The response body could not be decoded into a snapshot.
    #[error("undecodable snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while delivering a message to one subscriber.
///
/// A delivery error only affects the (point, subscriber) pair it occurred on.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bot API rejected the request.
    #[error("bot API error {code}: {description}")]
    Rejected {
        /// Error code reported by the API.
        code: i32,
        /// Human-readable description reported by the API.
        description: String,
    },

    /// The bot credential was not accepted.
    #[error("authentication failed")]
    Unauthorized,

    /// The API reply could not be decoded.
    #[error("undecodable API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The transport is no longer able to send.
    #[error("transport closed: {0}")]
    Closed(String),
}

/// Errors related to loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownCurrency("XYZ".to_string());
        assert_eq!(err.to_string(), "unknown currency: XYZ");
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::Missing("ATM_BOT_TOKEN").into();
        assert!(matches!(
            err,
            Error::Config(ConfigError::Missing("ATM_BOT_TOKEN"))
        ));
    }

    #[test]
    fn fetch_status_display() {
        let err = FetchError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected status 503: Service Unavailable"
        );
    }

    #[test]
    fn delivery_rejected_display() {
        let err = DeliveryError::Rejected {
            code: 403,
            description: "Forbidden: bot was blocked by the user".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "bot API error 403: Forbidden: bot was blocked by the user"
        );
    }

    #[test]
    fn fetch_error_from_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
