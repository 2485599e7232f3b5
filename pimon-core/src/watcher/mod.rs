//! Polling tail of the kernel's output log.

mod shutdown;
mod tail;

#[cfg(test)]
mod tests;

pub use shutdown::ShutdownHandle;
pub use tail::{LogTail, WatchError};

use crate::conf::SourceConfig;
use crate::monitor::Monitor;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Feeds every new line of the source file to the monitor until shut down.
#[derive(Debug)]
pub struct Watcher {
    monitor: Arc<Monitor>,
    config: SourceConfig,
}

impl Watcher {
    pub fn new(monitor: Arc<Monitor>, config: SourceConfig) -> Self {
        Self { monitor, config }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Poll until `shutdown` turns true or its sender goes away.
    ///
    /// Source errors are logged and retried; they never end the loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut tail = LogTail::new(self.config.path.clone(), self.config.start);
        let mut unavailable = false;

        tracing::info!(
            path = %tail.path().display(),
            start = ?self.config.start,
            "watcher started"
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let delay = match tail.poll().await {
                Ok(lines) => {
                    if unavailable {
                        tracing::info!(path = %tail.path().display(), "log source available");
                        unavailable = false;
                    }
                    if !lines.is_empty() {
                        let count = lines.len();
                        self.ingest(lines).await;
                        tracing::trace!(lines = count, offset = tail.cursor(), "lines ingested");
                    }
                    self.config.poll_interval()
                }
                Err(err @ WatchError::SourceUnavailable { .. }) => {
                    if !unavailable {
                        tracing::warn!(error = %err, "waiting for log source");
                        unavailable = true;
                    }
                    self.config.retry_delay()
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        offset = tail.cursor(),
                        "log source read failed; retrying"
                    );
                    self.config.retry_delay()
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!(path = %tail.path().display(), "watcher stopped");
    }

    /// Apply a batch off the async worker.
    ///
    /// Ingestion takes blocking scenario locks, which a replay can hold for a
    /// whole file.
    async fn ingest(&self, lines: Vec<String>) {
        let monitor = Arc::clone(&self.monitor);
        let batch = tokio::task::spawn_blocking(move || {
            for line in &lines {
                monitor.ingest_line(line, None);
            }
        });

        if let Err(err) = batch.await {
            tracing::error!(error = %err, "ingest task failed");
        }
    }
}
