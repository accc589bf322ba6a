// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Messaging transport boundary.
//!
//! The watcher talks to end users through a [`Transport`]: outbound it
//! delivers pre-rendered text to a subscriber, inbound it yields
//! [`SubscriptionSignal`]s that mutate the subscriber registry.
//!
//! - [`TelegramClient`]: Telegram bot API over HTTPS (requires the `http` feature)
//! - [`BotCommand`]: recognition of `/start` and `/stop`

mod command;
#[cfg(feature = "http")]
mod telegram;

pub use command::BotCommand;
#[cfg(feature = "http")]
pub use telegram::{BotUser, TelegramClient, TelegramConfig};

use std::future::Future;
use std::sync::Arc;

use crate::error::DeliveryError;
use crate::types::SubscriberId;

/// Outbound side of the messaging transport.
pub trait Transport: Send + Sync {
    /// Delivers a plain-text message to a subscriber.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError` if the message could not be sent.
    fn deliver(
        &self,
        subscriber: SubscriberId,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn deliver(
        &self,
        subscriber: SubscriberId,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).deliver(subscriber, text)
    }
}

/// Kind of an inbound subscription signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Start receiving notifications.
    Subscribe,
    /// Stop receiving notifications.
    Unsubscribe,
}

/// A subscribe or unsubscribe request from an end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSignal {
    /// Who sent the request.
    pub subscriber: SubscriberId,
    /// What was requested.
    pub kind: SignalKind,
    /// Display name of the sender, for logging only.
    pub username: Option<String>,
}

impl SubscriptionSignal {
    /// Creates a subscribe signal.
    #[must_use]
    pub fn subscribe(subscriber: SubscriberId) -> Self {
        Self {
            subscriber,
            kind: SignalKind::Subscribe,
            username: None,
        }
    }

    /// Creates an unsubscribe signal.
    #[must_use]
    pub fn unsubscribe(subscriber: SubscriberId) -> Self {
        Self {
            subscriber,
            kind: SignalKind::Unsubscribe,
            username: None,
        }
    }

    /// Attaches the sender's display name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
