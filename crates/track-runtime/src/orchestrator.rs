//! Async tracking orchestrator.
//!
//! Runs the single control loop the accounting engine requires: one tokio
//! task polls the observer at a fixed cadence, feeds the [`Tracker`], and
//! sends [`LedgerSnapshot`]s through an `mpsc` channel so the TUI event loop
//! can consume them without any shared mutable state. User commands arrive on
//! a second channel; closing it is the quit signal and triggers the final
//! flush.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use track_core::ledger::LedgerSnapshot;

use crate::notify::Notifier;
use crate::observer::ActiveWindowObserver;
use crate::tracker::{now_secs, Tracker};

/// Consecutive save failures tolerated before the loop gives up.
///
/// One failed write is a transient annoyance; this many in a row means the
/// storage path is effectively unwritable and looping silently would lose
/// data on every switch.
const MAX_CONSECUTIVE_SAVE_FAILURES: u32 = 5;

// ── Public types ──────────────────────────────────────────────────────────────

/// Commands forwarded from the input layer to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerCommand {
    /// Clear all recorded totals.
    Reset,
    /// Flip the focus-mode flag.
    ToggleFocusMode,
}

// ── TrackerOrchestrator ───────────────────────────────────────────────────────

/// Background tracking coordinator.
///
/// Call [`TrackerOrchestrator::start`] to spin up the polling loop in a
/// dedicated tokio task and receive the snapshot/command channel endpoints.
pub struct TrackerOrchestrator {
    /// How often to poll the observer.
    poll_interval: Duration,
    /// Leaderboard size included in each snapshot.
    top_n: usize,
}

impl TrackerOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Parameters
    /// - `poll_interval_ms` – milliseconds between observations.
    /// - `top_n`            – number of leaderboard entries per snapshot.
    pub fn new(poll_interval_ms: u64, top_n: usize) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            top_n,
        }
    }

    /// Start the tracking loop.
    ///
    /// Returns:
    /// - An `mpsc::Receiver<LedgerSnapshot>` for the presentation layer.
    /// - An `mpsc::Sender<TrackerCommand>` for the input layer; dropping all
    ///   senders shuts the loop down after a final save.
    /// - A [`TrackerHandle`] to await or abort the loop.
    pub fn start<N, O>(
        self,
        tracker: Tracker<N>,
        observer: O,
    ) -> (
        mpsc::Receiver<LedgerSnapshot>,
        mpsc::Sender<TrackerCommand>,
        TrackerHandle,
    )
    where
        N: Notifier + 'static,
        O: ActiveWindowObserver + 'static,
    {
        // Buffer a modest number of snapshots so slow consumers don't stall the loop.
        let (snapshot_tx, snapshot_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.tracking_loop(tracker, observer, snapshot_tx, cmd_rx)
                .await;
        });

        (snapshot_rx, cmd_tx, TrackerHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// The main tracking loop.
    ///
    /// Exits when the command channel closes, or when storage proves
    /// persistently unwritable. Always attempts a final flush on the way out.
    async fn tracking_loop<N, O>(
        self,
        mut tracker: Tracker<N>,
        mut observer: O,
        snapshot_tx: mpsc::Sender<LedgerSnapshot>,
        mut cmd_rx: mpsc::Receiver<TrackerCommand>,
    ) where
        N: Notifier,
        O: ActiveWindowObserver,
    {
        let mut interval = time::interval(self.poll_interval);
        let mut save_failures = 0u32;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let observed = observer.observe();
                    let now = now_secs();
                    match tracker.tick(observed, now) {
                        Ok(()) => save_failures = 0,
                        Err(e) => {
                            save_failures += 1;
                            tracing::error!(
                                error = %e,
                                consecutive = save_failures,
                                "failed to persist usage history"
                            );
                            if save_failures >= MAX_CONSECUTIVE_SAVE_FAILURES {
                                tracing::error!(
                                    "usage history is unwritable; stopping the tracking loop"
                                );
                                break;
                            }
                        }
                    }

                    if !self.send_snapshot(&snapshot_tx, &tracker, now) {
                        break;
                    }
                }

                cmd = cmd_rx.recv() => match cmd {
                    Some(TrackerCommand::Reset) => {
                        if let Err(e) = tracker.reset() {
                            tracing::error!(error = %e, "failed to persist reset");
                        }
                        if !self.send_snapshot(&snapshot_tx, &tracker, now_secs()) {
                            break;
                        }
                    }
                    Some(TrackerCommand::ToggleFocusMode) => {
                        tracker.toggle_focus_mode();
                        if !self.send_snapshot(&snapshot_tx, &tracker, now_secs()) {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("command channel closed; shutting down");
                        break;
                    }
                }
            }
        }

        if let Err(e) = tracker.shutdown(now_secs()) {
            tracing::error!(error = %e, "final history flush failed");
        }
    }

    /// Send a snapshot without blocking the loop.
    ///
    /// A full buffer just drops the snapshot (a fresher one follows next
    /// tick); a closed channel means the UI is gone, so returns `false`.
    fn send_snapshot<N: Notifier>(
        &self,
        tx: &mpsc::Sender<LedgerSnapshot>,
        tracker: &Tracker<N>,
        now: f64,
    ) -> bool {
        match tx.try_send(tracker.snapshot(now, self.top_n)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => true,
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("snapshot channel closed; shutting down");
                false
            }
        }
    }
}

// ── TrackerHandle ─────────────────────────────────────────────────────────────

/// A handle to the background tracking task.
pub struct TrackerHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl TrackerHandle {
    /// Wait for the loop to finish its final flush and exit.
    pub async fn join(self) {
        let _ = self.handle.await;
    }

    /// Immediately abort the tracking loop. Skips the final flush.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
