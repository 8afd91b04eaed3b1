// mudview - terminal client for text-based multi-user games
//
// Architecture:
// - Feed (demo script or replayed transcript): produces session events
// - Text pipeline: splits styled chunks into identified display lines
// - TUI (ratatui): scrollback view with scroll anchoring, input line,
//   key-combo dispatch
// - Event system: an mpsc channel connects feed and TUI

use anyhow::Result;
use clap::Parser;
use mudview::cli::{self, Cli};
use mudview::config::{Config, LogRotation};
use mudview::logging::{LogBuffer, TuiLogLayer};
use mudview::{demo, tui};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Subcommands (config --show, --reset, --edit, --path) exit early.
    if cli::handle_cli(&args) {
        return Ok(());
    }

    // Ensure the config template exists so users can discover options.
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if let Some(replay) = args.replay {
        config.replay = Some(replay);
    }

    // Logs are captured into an in-memory buffer for the status bar; they
    // must never hit stdout while the alternate screen is active.
    // Precedence: RUST_LOG env var > config file > default "info".
    let log_buffer = LogBuffer::new();
    let default_filter = format!("mudview={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // The guard must stay alive for the program's duration so file logs
    // flush on exit.
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> =
        if config.logging.file_enabled {
            match std::fs::create_dir_all(&config.logging.file_dir) {
                Ok(()) => {
                    let appender = match config.logging.file_rotation {
                        LogRotation::Hourly => tracing_appender::rolling::hourly(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                        LogRotation::Daily => tracing_appender::rolling::daily(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                        LogRotation::Never => tracing_appender::rolling::never(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                    };
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .with(
                            tracing_subscriber::fmt::layer()
                                .json()
                                .with_writer(non_blocking)
                                .with_ansi(false),
                        )
                        .init();
                    Some(guard)
                }
                Err(e) => {
                    eprintln!(
                        "Warning: could not create log directory {:?}: {}",
                        config.logging.file_dir, e
                    );
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .init();
                    None
                }
            }
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        };

    // Bounded event channel: the feed waits when the TUI falls behind.
    let (event_tx, event_rx) = mpsc::channel(1000);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let feed_handle = match config.replay.clone() {
        Some(path) => {
            tracing::info!("replaying transcript {}", path.display());
            tokio::spawn(async move {
                if let Err(e) = demo::run_replay(&path, event_tx, shutdown_rx).await {
                    tracing::error!("replay failed: {e:#}");
                }
            })
        }
        None => {
            tracing::info!("no transport configured, running demo session");
            tokio::spawn(async move {
                demo::run_demo(event_tx, shutdown_rx).await;
            })
        }
    };

    // The TUI runs on the main task and blocks until the user quits.
    if let Err(e) = tui::run_tui(event_rx, log_buffer, config).await {
        tracing::error!("TUI error: {e:?}");
    }

    tracing::info!("shutting down");
    let _ = shutdown_tx.send(());
    let _ = feed_handle.await;

    Ok(())
}
