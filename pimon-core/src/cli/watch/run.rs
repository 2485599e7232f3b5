use super::constants::RENDER_TICK;
use super::render::{redraw, render_pretty, render_stats};
use crate::broadcast::{BroadcastNotifier, Delta};
use crate::conf::load_or_default;
use crate::logging::{LogMode, init_file_logging, init_logging};
use crate::monitor::Monitor;
use crate::watcher::{ShutdownHandle, Watcher};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub config: Option<PathBuf>,
    /// Overrides `source.path` from the config.
    pub log: Option<PathBuf>,
    pub mode: LogMode,
}

pub fn run_watch(opts: WatchOptions) -> Result<()> {
    // The dashboard owns the terminal, so its own logs go to a file.
    let _guard = match opts.mode {
        LogMode::Stats => Some(init_file_logging(&std::env::current_dir()?)),
        LogMode::Raw | LogMode::Pretty => {
            init_logging();
            None
        }
    };

    let mut cfg = load_or_default(opts.config.as_deref())?;
    if let Some(log) = opts.log {
        cfg.source.path = log;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async move {
        let notifier = Arc::new(BroadcastNotifier::new(cfg.broadcast.capacity));
        let deltas = notifier.subscribe();
        let monitor = Arc::new(Monitor::new(&cfg, notifier));

        let shutdown = ShutdownHandle::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            if let Err(err) = signal.install_signal_handler().await {
                tracing::warn!(error = %err, "failed to listen for ctrl-c");
            }
        });

        let watcher =
            Watcher::new(monitor.clone(), cfg.source.clone()).spawn(shutdown.subscribe());

        let printed = match opts.mode {
            LogMode::Raw => {
                print_deltas(deltas, shutdown.subscribe(), |delta| {
                    Ok(Some(serde_json::to_string(delta)?))
                })
                .await
            }
            LogMode::Pretty => {
                print_deltas(deltas, shutdown.subscribe(), |delta| {
                    Ok(render_pretty(delta))
                })
                .await
            }
            LogMode::Stats => {
                drop(deltas);
                run_dashboard(&monitor, shutdown.subscribe()).await;
                Ok(())
            }
        };

        shutdown.trigger();
        watcher.await.context("watcher task failed")?;
        printed
    })
}

async fn print_deltas<F>(
    mut deltas: broadcast::Receiver<Delta>,
    mut shutdown: watch::Receiver<bool>,
    render: F,
) -> Result<()>
where
    F: Fn(&Delta) -> Result<Option<String>>,
{
    let mut stdout = io::stdout();

    loop {
        tokio::select! {
            received = deltas.recv() => match received {
                Ok(delta) => {
                    if let Some(line) = render(&delta)? {
                        // A closed stdout (e.g. `| head`) ends the session.
                        if writeln!(stdout, "{line}").is_err() {
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "output fell behind; deltas dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn run_dashboard(monitor: &Monitor, mut shutdown: watch::Receiver<bool>) {
    let mut tick = tokio::time::interval(RENDER_TICK);

    // Hide cursor while dashboard runs.
    print!("\x1b[?25l");
    let _ = io::stdout().flush();

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let scenario = monitor.default_scenario();
                match monitor.get_snapshot(&scenario) {
                    Ok(snapshot) => redraw(&render_stats(&snapshot)),
                    Err(err) => tracing::warn!(error = %err, "dashboard refresh failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    // Restore cursor
    print!("\x1b[?25h");
    let _ = io::stdout().flush();
}
