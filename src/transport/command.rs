// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bot command recognition.

use super::SignalKind;

/// A command sent to the bot by a user.
///
/// Only subscription management is recognised; everything else is
/// [`BotCommand::Unknown`] and gets a fixed reply.
///
/// # Examples
///
/// ```
/// use atm_watch::transport::{BotCommand, SignalKind};
///
/// assert_eq!(BotCommand::parse("/start"), BotCommand::Start);
/// assert_eq!(BotCommand::parse("/stop@atm_bot"), BotCommand::Stop);
/// assert_eq!(BotCommand::parse("/start").signal_kind(), Some(SignalKind::Subscribe));
/// assert_eq!(BotCommand::parse("hello").signal_kind(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/start`: join the mailing list.
    Start,
    /// `/stop`, `/end` or `/unsubscribe`: leave the mailing list.
    Stop,
    /// Anything else, including plain text.
    Unknown(String),
}

impl BotCommand {
    /// Reply sent after a successful subscribe.
    pub const SUBSCRIBED_REPLY: &'static str = "Added to the mailing list";
    /// Reply sent after an unsubscribe.
    pub const UNSUBSCRIBED_REPLY: &'static str = "Removed from the mailing list";
    /// Reply sent for unrecognised input.
    pub const UNKNOWN_REPLY: &'static str = "Unresolved command";

    /// Parses the text of an inbound message.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let Some(rest) = text.strip_prefix('/') else {
            return Self::Unknown(text.to_string());
        };

        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default();

        match name.to_lowercase().as_str() {
            "start" => Self::Start,
            "stop" | "end" | "unsubscribe" => Self::Stop,
            _ => Self::Unknown(text.to_string()),
        }
    }

    /// Returns the registry signal this command maps to, if any.
    #[must_use]
    pub fn signal_kind(&self) -> Option<SignalKind> {
        match self {
            Self::Start => Some(SignalKind::Subscribe),
            Self::Stop => Some(SignalKind::Unsubscribe),
            Self::Unknown(_) => None,
        }
    }

    /// Returns the text to reply with.
    #[must_use]
    pub fn reply_text(&self) -> &'static str {
        match self {
            Self::Start => Self::SUBSCRIBED_REPLY,
            Self::Stop => Self::UNSUBSCRIBED_REPLY,
            Self::Unknown(_) => Self::UNKNOWN_REPLY,
        }
    }
}
