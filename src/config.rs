// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process configuration loaded from environment variables.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::source::DEFAULT_POLL_INTERVAL;

#[cfg(feature = "http")]
use crate::source::SourceConfig;
#[cfg(feature = "http")]
use crate::transport::TelegramConfig;

/// Name of the variable holding the bot credential.
pub const BOT_TOKEN_VAR: &str = "ATM_BOT_TOKEN";
/// Name of the variable holding the poll interval in seconds.
pub const POLL_INTERVAL_VAR: &str = "ATM_POLL_INTERVAL_SECS";
/// Name of the variable overriding the point feed endpoint.
pub const SOURCE_URL_VAR: &str = "ATM_SOURCE_URL";

/// Default point feed endpoint.
pub const DEFAULT_SOURCE_URL: &str = "https://api.tinkoff.ru/geo/withdraw/clusters";

/// Runtime configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use atm_watch::config::Config;
///
/// let config = Config::from_lookup(|name| match name {
///     "ATM_BOT_TOKEN" => Some("123:abc".to_string()),
///     "ATM_POLL_INTERVAL_SECS" => Some("30".to_string()),
///     _ => None,
/// })
/// .unwrap();
///
/// assert_eq!(config.poll_interval(), Duration::from_secs(30));
/// ```
#[derive(Clone)]
pub struct Config {
    bot_token: String,
    poll_interval: Duration,
    source_url: String,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the bot token is not set and
    /// [`ConfigError::Invalid`] if a value cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get(BOT_TOKEN_VAR).ok_or(ConfigError::Missing(BOT_TOKEN_VAR))?;

        let poll_interval = match get(POLL_INTERVAL_VAR) {
            Some(raw) => parse_interval(&raw)?,
            None => DEFAULT_POLL_INTERVAL,
        };

        let source_url = get(SOURCE_URL_VAR).unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());
        if !source_url.starts_with("http://") && !source_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: SOURCE_URL_VAR,
                message: format!("expected an http(s) URL, got {source_url:?}"),
            });
        }

        Ok(Self {
            bot_token,
            poll_interval,
            source_url,
        })
    }

    /// Returns the bot credential.
    #[must_use]
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    /// Returns the delay between the end of one fetch and the start of the next.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the point feed endpoint.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Builds the bot client configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig::new(self.bot_token.clone())
    }

    /// Builds the point feed configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn source(&self) -> SourceConfig {
        SourceConfig::new(self.source_url.clone())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("poll_interval", &self.poll_interval)
            .field("source_url", &self.source_url)
            .finish()
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.parse().map_err(|e| ConfigError::Invalid {
        name: POLL_INTERVAL_VAR,
        message: format!("{raw:?} is not a whole number of seconds: {e}"),
    })?;

    if secs == 0 {
        return Err(ConfigError::Invalid {
            name: POLL_INTERVAL_VAR,
            message: "must be greater than zero".to_string(),
        });
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[(BOT_TOKEN_VAR, "123:abc")])).unwrap();

        assert_eq!(config.bot_token(), "123:abc");
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.source_url(), DEFAULT_SOURCE_URL);
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(BOT_TOKEN_VAR));

        let err = Config::from_lookup(lookup(&[(BOT_TOKEN_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(BOT_TOKEN_VAR));
    }

    #[test]
    fn interval_overrides() {
        let config = Config::from_lookup(lookup(&[
            (BOT_TOKEN_VAR, "t"),
            (POLL_INTERVAL_VAR, " 15 "),
        ]))
        .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(15));
    }

    #[test]
    fn zero_or_garbage_interval_is_invalid() {
        for raw in ["0", "-5", "soon", "1.5"] {
            let err = Config::from_lookup(lookup(&[(BOT_TOKEN_VAR, "t"), (POLL_INTERVAL_VAR, raw)]))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name, .. } if name == POLL_INTERVAL_VAR),
                "{raw} accepted"
            );
        }
    }

    #[test]
    fn source_url_must_be_http() {
        let config = Config::from_lookup(lookup(&[
            (BOT_TOKEN_VAR, "t"),
            (SOURCE_URL_VAR, "http://localhost:8080/clusters"),
        ]))
        .unwrap();
        assert_eq!(config.source_url(), "http://localhost:8080/clusters");

        let err = Config::from_lookup(lookup(&[(BOT_TOKEN_VAR, "t"), (SOURCE_URL_VAR, "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == SOURCE_URL_VAR));
    }

    #[test]
    fn debug_redacts_token() {
        let config = Config::from_lookup(lookup(&[(BOT_TOKEN_VAR, "super-secret")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn builds_collaborator_configs() {
        let config = Config::from_lookup(lookup(&[
            (BOT_TOKEN_VAR, "t"),
            (SOURCE_URL_VAR, "https://feed.example/clusters"),
        ]))
        .unwrap();

        assert_eq!(config.source().url(), "https://feed.example/clusters");
        assert_eq!(config.telegram().api_url(), TelegramConfig::DEFAULT_API_URL);
    }
}
