//! The tracker: ledger + store + notifier.
//!
//! [`Tracker`] composes the pure [`UsageLedger`] with the durable
//! [`HistoryStore`] and a [`Notifier`], performing the side effects the
//! accounting algorithm calls for: notify on a blocked observation, persist
//! synchronously whenever accumulated totals change.

use std::collections::HashSet;

use track_core::error::Result;
use track_core::ledger::{BlockPolicy, LedgerSnapshot, TickOutcome, UsageLedger};
use track_core::model::ApplicationId;
use track_data::history::HistoryStore;

use crate::notify::Notifier;

/// Current wall-clock reading in fractional seconds since the Unix epoch.
pub fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1e6
}

/// Accounting engine with durable storage and notification wired in.
pub struct Tracker<N: Notifier> {
    ledger: UsageLedger,
    store: HistoryStore,
    notifier: N,
}

impl<N: Notifier> Tracker<N> {
    /// Create a tracker, loading any persisted history from `store`.
    ///
    /// An absent or corrupt history file is non-fatal and yields empty
    /// totals.
    pub fn new(
        blocked: HashSet<ApplicationId>,
        block_policy: BlockPolicy,
        focus_mode: bool,
        store: HistoryStore,
        notifier: N,
    ) -> Self {
        let mut ledger = UsageLedger::new(blocked, block_policy, focus_mode);
        ledger.merge_history(store.load());
        Self {
            ledger,
            store,
            notifier,
        }
    }

    /// Feed one observation into the engine.
    ///
    /// Blocked observations trigger a notification; switches that closed a
    /// segment are flushed to disk before returning. A save failure is
    /// returned to the caller (totals stay in memory and will be retried on
    /// the next flush).
    pub fn tick(&mut self, observed: ApplicationId, now_secs: f64) -> Result<()> {
        match self.ledger.tick(observed.clone(), now_secs) {
            TickOutcome::Blocked { flush } => {
                self.notifier
                    .notify(&format!("Focus Mode: {} is blocked!", observed));
                if flush {
                    self.store.save(self.ledger.usage())?;
                }
            }
            TickOutcome::Switched { flush } => {
                if flush {
                    self.store.save(self.ledger.usage())?;
                }
            }
            TickOutcome::Unchanged => {}
        }
        Ok(())
    }

    /// Flip focus mode, returning the new value.
    pub fn toggle_focus_mode(&mut self) -> bool {
        let on = self.ledger.toggle_focus_mode();
        tracing::info!("focus mode {}", if on { "ON" } else { "OFF" });
        on
    }

    /// Discard all recorded totals and persist the empty state.
    pub fn reset(&mut self) -> Result<()> {
        self.ledger.reset();
        self.store.save(self.ledger.usage())
    }

    /// Materialise the open segment and write the final state to disk.
    pub fn shutdown(&mut self, now_secs: f64) -> Result<()> {
        self.ledger.finalize(now_secs);
        self.store.save(self.ledger.usage())
    }

    /// Read-only view for presentation.
    pub fn snapshot(&self, now_secs: f64, top_n: usize) -> LedgerSnapshot {
        self.ledger.snapshot(now_secs, top_n)
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use track_core::model::UsageRecord;

    /// Notifier that records every message for assertions.
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn app(name: &str) -> ApplicationId {
        ApplicationId::new(name)
    }

    fn tracker_in(
        tmp: &TempDir,
        blocked: &[&str],
        focus: bool,
    ) -> (Tracker<RecordingNotifier>, RecordingNotifier) {
        let notifier = RecordingNotifier::default();
        let store = HistoryStore::new(tmp.path().join("history.json"));
        let blocked = blocked.iter().map(|n| ApplicationId::new(*n)).collect();
        let tracker = Tracker::new(blocked, BlockPolicy::Compat, focus, store, notifier.clone());
        (tracker, notifier)
    }

    #[test]
    fn test_switch_persists_totals() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, _) = tracker_in(&tmp, &[], false);

        tracker.tick(app("A"), 0.0).unwrap();
        tracker.tick(app("B"), 10.0).unwrap();

        // The switch flushed A's segment to disk.
        let loaded = HistoryStore::new(tmp.path().join("history.json")).load();
        assert_eq!(loaded[&app("A")].duration, 10.0);
    }

    #[test]
    fn test_first_tick_does_not_write() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, _) = tracker_in(&tmp, &[], false);

        tracker.tick(app("A"), 0.0).unwrap();
        assert!(!tmp.path().join("history.json").exists());
    }

    #[test]
    fn test_blocked_tick_notifies_and_skips_accounting() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, notifier) = tracker_in(&tmp, &["YouTube"], true);

        tracker.tick(app("A"), 0.0).unwrap();
        tracker.tick(app("YouTube"), 5.0).unwrap();

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), ["Focus Mode: YouTube is blocked!"]);
        assert!(tracker.ledger().usage().is_empty());
        assert!(!tmp.path().join("history.json").exists());
    }

    #[test]
    fn test_unblocked_ticks_do_not_notify() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, notifier) = tracker_in(&tmp, &["YouTube"], false);

        tracker.tick(app("YouTube"), 0.0).unwrap();
        tracker.tick(app("A"), 5.0).unwrap();
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reset_persists_empty_state() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, _) = tracker_in(&tmp, &[], false);

        tracker.tick(app("A"), 0.0).unwrap();
        tracker.tick(app("B"), 10.0).unwrap();
        tracker.reset().unwrap();

        let loaded = HistoryStore::new(tmp.path().join("history.json")).load();
        assert!(loaded.is_empty());
        // Tracking continues for the application that was current at reset.
        assert_eq!(tracker.ledger().current(), Some(&app("B")));
    }

    #[test]
    fn test_shutdown_flushes_open_segment() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, _) = tracker_in(&tmp, &[], false);

        tracker.tick(app("A"), 0.0).unwrap();
        tracker.shutdown(30.0).unwrap();

        let loaded = HistoryStore::new(tmp.path().join("history.json")).load();
        assert_eq!(loaded[&app("A")].duration, 30.0);
    }

    #[test]
    fn test_restart_restores_persisted_totals() {
        let tmp = TempDir::new().expect("tempdir");
        {
            let (mut tracker, _) = tracker_in(&tmp, &[], false);
            tracker.tick(app("A"), 0.0).unwrap();
            tracker.shutdown(25.0).unwrap();
        }

        let (mut tracker, _) = tracker_in(&tmp, &[], false);
        assert_eq!(tracker.ledger().usage()[&app("A")].duration, 25.0);

        // Accumulation continues on top of the restored total.
        tracker.tick(app("A"), 100.0).unwrap();
        tracker.tick(app("B"), 110.0).unwrap();
        assert_eq!(tracker.ledger().usage()[&app("A")].duration, 35.0);
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(tmp.path().join("history.json"), "�garbage�").expect("write");

        let (tracker, _) = tracker_in(&tmp, &[], false);
        assert!(tracker.ledger().usage().is_empty());
    }

    #[test]
    fn test_save_failure_surfaces_error() {
        let tmp = TempDir::new().expect("tempdir");
        // Make the history path a directory so every save fails.
        let target = tmp.path().join("history.json");
        std::fs::create_dir(&target).expect("create dir");

        let notifier = RecordingNotifier::default();
        let store = HistoryStore::new(&target);
        let mut tracker = Tracker::new(
            HashSet::new(),
            BlockPolicy::Compat,
            false,
            store,
            notifier,
        );

        tracker.tick(app("A"), 0.0).unwrap();
        assert!(tracker.tick(app("B"), 10.0).is_err());
        // In-memory totals survive the failed flush.
        assert_eq!(tracker.ledger().usage()[&app("A")].duration, 10.0);
    }

    #[test]
    fn test_round_trip_matches_in_memory_state() {
        let tmp = TempDir::new().expect("tempdir");
        let (mut tracker, _) = tracker_in(&tmp, &[], false);

        tracker.tick(app("firefox"), 0.0).unwrap();
        tracker.tick(app("code"), 12.25).unwrap();
        tracker.tick(app("firefox"), 40.0).unwrap();
        tracker.shutdown(60.5).unwrap();

        let expected: std::collections::HashMap<ApplicationId, UsageRecord> =
            tracker.ledger().usage().clone();
        let loaded = HistoryStore::new(tmp.path().join("history.json")).load();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_now_secs_is_monotonicish() {
        let a = now_secs();
        let b = now_secs();
        assert!(b >= a);
        assert!(a > 1_600_000_000.0, "epoch seconds expected, got {a}");
    }
}
