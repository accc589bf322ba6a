// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ATM watch bot.
//!
//! Polls the point feed, and messages `/start` subscribers about every
//! newly visible ATM. Configured through `ATM_BOT_TOKEN`,
//! `ATM_POLL_INTERVAL_SECS` and `ATM_SOURCE_URL`; log verbosity follows
//! `RUST_LOG`.

use std::process::ExitCode;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use atm_watch::config::Config;
use atm_watch::source::{DEFAULT_CHANNEL_CAPACITY, spawn_poller};
use atm_watch::watcher::Watcher;

const SIGNAL_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> atm_watch::Result<()> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let bot = config.telegram().into_client()?;
    let me = bot.authenticate().await?;
    tracing::info!(account = me.username.as_deref().unwrap_or("-"), "Authorized on account");

    let mut watcher = Watcher::new(bot.clone());

    let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
    watcher.spawn_signal_handler(signal_rx);
    tokio::spawn(async move { bot.run_updates(signal_tx).await });

    let source = config.source().into_source()?;
    tracing::info!(
        url = source.url(),
        interval_secs = config.poll_interval().as_secs(),
        "Polling point feed"
    );
    let snapshots = spawn_poller(source, config.poll_interval(), DEFAULT_CHANNEL_CAPACITY);

    watcher.run(snapshots).await;
    Ok(())
}
