// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic snapshot polling.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::types::Snapshot;

use super::StateSource;

/// Default pause between the end of one fetch and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of snapshots buffered between the poller and the pipeline.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4;

/// Spawns a task that polls `source` and streams snapshots.
///
/// Pacing is sequential: the task sleeps `interval` after each fetch
/// completes, so a slow fetch delays the next one. A failed fetch is logged
/// and produces no snapshot. The task stops once the returned receiver is
/// dropped.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use atm_watch::source::{SourceConfig, spawn_poller};
///
/// # async fn example() -> Result<(), atm_watch::FetchError> {
/// let source = SourceConfig::default().into_source()?;
/// let mut snapshots = spawn_poller(source, Duration::from_secs(60), 4);
///
/// while let Some(snapshot) = snapshots.recv().await {
///     println!("{} points", snapshot.point_count());
/// }
/// # Ok(())
/// # }
/// ```
pub fn spawn_poller<S>(source: S, interval: Duration, capacity: usize) -> mpsc::Receiver<Snapshot>
where
    S: StateSource + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(async move {
        tracing::debug!(?interval, "Starting snapshot poller");

        loop {
            match source.fetch().await {
                Ok(snapshot) => {
                    if tx.send(snapshot).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch snapshot, skipping cycle");
                    if tx.is_closed() {
                        break;
                    }
                }
            }

            tokio::time::sleep(interval).await;
        }

        tracing::debug!("Snapshot poller stopped");
    });

    rx
}
