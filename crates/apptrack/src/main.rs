mod bootstrap;

use std::collections::HashSet;

use anyhow::Result;
use track_core::ledger::BlockPolicy;
use track_core::model::ApplicationId;
use track_core::settings::Settings;
use track_data::history::HistoryStore;
use track_runtime::notify::DesktopNotifier;
use track_runtime::observer::CommandObserver;
use track_runtime::orchestrator::TrackerOrchestrator;
use track_runtime::tracker::Tracker;
use track_ui::app::App;

/// Portable default for resolving the foreground application's name.
/// Any failure (missing helper, Wayland, headless) degrades to `Unknown`.
const DEFAULT_OBSERVE_COMMAND: &str = "xdotool getwindowfocus getwindowclassname";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("apptrack v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "History: {}, poll interval: {} ms, {} blocked app(s)",
        settings.history_file.display(),
        settings.poll_interval_ms,
        settings.blocked.len()
    );

    let blocked: HashSet<ApplicationId> = settings
        .blocked
        .iter()
        .map(|name| ApplicationId::new(name.as_str()))
        .collect();
    let block_policy = if settings.strict_block_accounting {
        BlockPolicy::Strict
    } else {
        BlockPolicy::Compat
    };

    let store = HistoryStore::new(&settings.history_file);
    let tracker = Tracker::new(
        blocked,
        block_policy,
        settings.focus,
        store,
        DesktopNotifier::default(),
    );

    let observe_command = settings
        .observe_command
        .as_deref()
        .unwrap_or(DEFAULT_OBSERVE_COMMAND);
    let observer = CommandObserver::new(observe_command)?;

    let orchestrator =
        TrackerOrchestrator::new(settings.poll_interval_ms, usize::from(settings.top));
    let (snapshot_rx, cmd_tx, handle) = orchestrator.start(tracker, observer);

    let app = App::new(&settings.theme);

    // Run the TUI event loop. The loop exits on 'q' / Ctrl+C inside the TUI.
    // We also listen for Ctrl+C at the OS level so that signals received
    // while the terminal is in raw mode are handled cleanly.
    tokio::select! {
        result = app.run(snapshot_rx, cmd_tx.clone()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }

    // Closing the command channel tells the tracking loop to flush the open
    // segment and exit; wait for that before terminating.
    drop(cmd_tx);
    handle.join().await;

    tracing::info!("apptrack stopped");
    Ok(())
}
