// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telegram bot API transport.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::DeliveryError;
use crate::types::SubscriberId;

use super::{BotCommand, SubscriptionSignal, Transport};

// ============================================================================
// TelegramConfig
// ============================================================================

/// Configuration for the Telegram bot client.
///
/// The bot token is a secret; it never appears in `Debug` output or logs.
///
/// # Examples
///
/// ```
/// use atm_watch::transport::TelegramConfig;
/// use std::time::Duration;
///
/// let config = TelegramConfig::new("123456:secret")
///     .with_long_poll_timeout(Duration::from_secs(30));
///
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct TelegramConfig {
    token: String,
    api_url: String,
    request_timeout: Duration,
    long_poll_timeout: Duration,
    retry_delay: Duration,
}

impl TelegramConfig {
    /// Default bot API endpoint.
    pub const DEFAULT_API_URL: &'static str = "https://api.telegram.org";
    /// Default timeout for regular API calls.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default server-side wait for `getUpdates`.
    pub const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(60);
    /// Default pause after a failed `getUpdates`.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

    /// Creates a configuration for the given bot token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: Self::DEFAULT_API_URL.to_string(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            long_poll_timeout: Self::DEFAULT_LONG_POLL_TIMEOUT,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        }
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the timeout for regular API calls.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how long `getUpdates` may wait for new messages.
    #[must_use]
    pub fn with_long_poll_timeout(mut self, timeout: Duration) -> Self {
        self.long_poll_timeout = timeout;
        self
    }

    /// Sets the pause after a failed `getUpdates`.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the timeout for regular API calls.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the long poll timeout.
    #[must_use]
    pub fn long_poll_timeout(&self) -> Duration {
        self.long_poll_timeout
    }

    /// Returns the retry delay.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Creates a `TelegramClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<TelegramClient, DeliveryError> {
        let client = Client::builder().build()?;

        Ok(TelegramClient {
            client,
            api_url: self.api_url,
            token: self.token,
            request_timeout: self.request_timeout,
            long_poll_timeout: self.long_poll_timeout,
            retry_delay: self.retry_delay,
        })
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("long_poll_timeout", &self.long_poll_timeout)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i32>,
    description: Option<String>,
}

/// The bot account behind a token, as reported by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotUser {
    /// Numeric id of the bot account.
    pub id: i64,
    /// Bot username, without the leading `@`.
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: i64,
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    username: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct NoParams {}

// ============================================================================
// TelegramClient
// ============================================================================

/// Client for the Telegram bot API.
///
/// Delivers notifications via `sendMessage` and turns inbound `/start` and
/// `/stop` commands into [`SubscriptionSignal`]s via long-polled `getUpdates`.
///
/// # Examples
///
/// ```no_run
/// use atm_watch::transport::{TelegramConfig, Transport};
/// use atm_watch::types::SubscriberId;
///
/// # async fn example() -> Result<(), atm_watch::DeliveryError> {
/// let client = TelegramConfig::new("123456:secret").into_client()?;
/// let me = client.authenticate().await?;
/// println!("Authorized as {:?}", me.username);
///
/// client.deliver(SubscriberId::new(42), "hello").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
    request_timeout: Duration,
    long_poll_timeout: Duration,
    retry_delay: Duration,
}

impl TelegramClient {
    /// Builds the URL of a bot API method.
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token)
    }

    /// Calls a bot API method and unwraps its `result`.
    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> Result<R, DeliveryError>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        tracing::trace!(method, "Calling bot API");

        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DeliveryError::Unauthorized);
        }

        let body = response.text().await?;
        let reply: ApiResponse<R> = serde_json::from_str(&body)?;

        if !reply.ok {
            return Err(DeliveryError::Rejected {
                code: reply
                    .error_code
                    .unwrap_or_else(|| i32::from(status.as_u16())),
                description: reply
                    .description
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        reply.result.ok_or_else(|| DeliveryError::Rejected {
            code: i32::from(status.as_u16()),
            description: format!("{method} returned no result"),
        })
    }

    /// Verifies the token and returns the bot account.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Unauthorized` if the token is rejected.
    pub async fn authenticate(&self) -> Result<BotUser, DeliveryError> {
        self.call("getMe", &NoParams {}, self.request_timeout).await
    }

    /// Sends a text message to a chat.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError` if the API call fails.
    pub async fn send_message(
        &self,
        chat: SubscriberId,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), DeliveryError> {
        let params = SendMessageParams {
            chat_id: chat.value(),
            text,
            reply_to_message_id: reply_to,
        };
        let _: IgnoredAny = self
            .call("sendMessage", &params, self.request_timeout)
            .await?;
        Ok(())
    }

    /// Long-polls for updates after `offset`.
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, DeliveryError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.long_poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call(
            "getUpdates",
            &params,
            self.long_poll_timeout + self.request_timeout,
        )
        .await
    }

    /// Receives inbound messages and forwards subscription signals.
    ///
    /// Every message gets a reply. Fetch errors are logged and retried after
    /// the configured delay. Returns as soon as the receiving side of
    /// `signals` is dropped, even in the middle of a long poll.
    pub async fn run_updates(&self, signals: mpsc::Sender<SubscriptionSignal>) {
        let mut offset = None;

        loop {
            let polled = tokio::select! {
                () = signals.closed() => None,
                result = self.get_updates(offset) => Some(result),
            };

            let updates = match polled {
                None => {
                    tracing::debug!("Signal receiver dropped, stopping update loop");
                    return;
                }
                Some(Ok(updates)) => updates,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Failed to fetch bot updates");
                    tokio::select! {
                        () = signals.closed() => {}
                        () = tokio::time::sleep(self.retry_delay) => {}
                    }
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);

                let Some(signal) = self.handle_update(update).await else {
                    continue;
                };
                if signals.send(signal).await.is_err() {
                    tracing::debug!("Signal receiver dropped, stopping update loop");
                    return;
                }
            }
        }
    }

    /// Replies to one update and returns the signal it carries, if any.
    async fn handle_update(&self, update: Update) -> Option<SubscriptionSignal> {
        let message = update.message?;
        let chat = SubscriberId::new(message.chat.id);
        let command = BotCommand::parse(message.text.as_deref().unwrap_or_default());

        tracing::debug!(subscriber = %chat, ?command, "Received bot command");

        if let Err(e) = self
            .send_message(chat, command.reply_text(), Some(message.message_id))
            .await
        {
            tracing::warn!(subscriber = %chat, error = %e, "Failed to reply to command");
        }

        let kind = command.signal_kind()?;
        Some(SubscriptionSignal {
            subscriber: chat,
            kind,
            username: message.from.and_then(|user| user.username),
        })
    }
}

impl Transport for TelegramClient {
    async fn deliver(&self, subscriber: SubscriberId, text: &str) -> Result<(), DeliveryError> {
        self.send_message(subscriber, text, None).await
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("long_poll_timeout", &self.long_poll_timeout)
            .finish_non_exhaustive()
    }
}
