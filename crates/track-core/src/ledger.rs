//! Usage-accounting ledger.
//!
//! [`UsageLedger`] is the state machine that converts a stream of
//! "currently active application" observations into per-application duration
//! totals under the focus-mode gating policy. It is pure state: persistence
//! and notification are performed by the caller based on the returned
//! [`TickOutcome`], which keeps the ledger trivially testable.

use std::collections::{HashMap, HashSet};

use crate::model::{ApplicationId, UsageRecord};

// ── BlockPolicy ───────────────────────────────────────────────────────────────

/// How a blocked observation interacts with the open segment.
///
/// The historical behaviour (`Compat`) freezes the switch timestamp during a
/// blocked interval, so the next non-blocked switch attributes the whole
/// blocked-plus-active interval to whichever application was current before
/// blocking began. `Strict` instead closes the open segment when blocking
/// starts, so blocked time is attributed to nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockPolicy {
    /// Blocked observations mutate nothing (historical behaviour).
    #[default]
    Compat,
    /// Blocked observations close the open segment at the block boundary.
    Strict,
}

// ── TickOutcome ───────────────────────────────────────────────────────────────

/// Result of feeding one observation into the ledger.
///
/// `flush` tells the caller whether accumulated totals changed and must be
/// persisted before the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Focus mode suppressed the observation; the caller should notify the
    /// user that the application is blocked.
    Blocked { flush: bool },
    /// The foreground application changed.
    Switched { flush: bool },
    /// Same application as before; the open segment keeps accruing.
    Unchanged,
}

// ── LedgerSnapshot ────────────────────────────────────────────────────────────

/// Read-only view of the ledger for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    /// Application currently being timed, if tracking has started.
    pub current: Option<ApplicationId>,
    /// Whether focus mode is active.
    pub focus_mode: bool,
    /// Seconds accrued in the open segment, not yet materialised in `top`.
    pub open_segment_secs: f64,
    /// Leaderboard: `(application, total seconds)` sorted by duration
    /// descending, ties broken by first-seen order.
    pub top: Vec<(ApplicationId, f64)>,
}

// ── UsageLedger ───────────────────────────────────────────────────────────────

/// Per-application active-time accounting.
///
/// A single logical owner drives the ledger: observations arrive through
/// [`UsageLedger::tick`] with a non-decreasing clock reading, and the open
/// segment for the current application is only materialised on a switch,
/// [`UsageLedger::finalize`], or never (after [`UsageLedger::reset`] the
/// segment keeps running against the cleared totals).
pub struct UsageLedger {
    usage: HashMap<ApplicationId, UsageRecord>,
    /// First-seen order of keys in `usage`, for stable leaderboard ties.
    order: Vec<ApplicationId>,
    current: Option<ApplicationId>,
    last_switch_secs: f64,
    focus_mode: bool,
    blocked: HashSet<ApplicationId>,
    block_policy: BlockPolicy,
}

impl UsageLedger {
    /// Create an empty ledger.
    ///
    /// `blocked` is the fixed set of applications suppressed while focus mode
    /// is on; `focus_mode` is the starting state of the toggle.
    pub fn new(blocked: HashSet<ApplicationId>, block_policy: BlockPolicy, focus_mode: bool) -> Self {
        Self {
            usage: HashMap::new(),
            order: Vec::new(),
            current: None,
            last_switch_secs: 0.0,
            focus_mode,
            blocked,
            block_policy,
        }
    }

    // ── Accounting ────────────────────────────────────────────────────────

    /// Feed one observation into the ledger.
    ///
    /// `now_secs` must be non-decreasing across calls; a backwards jump is
    /// clamped to a zero-length delta and logged as a recovered anomaly.
    pub fn tick(&mut self, observed: ApplicationId, now_secs: f64) -> TickOutcome {
        if self.focus_mode && self.blocked.contains(&observed) {
            return match self.block_policy {
                // Historical behaviour: nothing moves, the open segment
                // stays frozen at its original start.
                BlockPolicy::Compat => TickOutcome::Blocked { flush: false },
                BlockPolicy::Strict => {
                    if let Some(previous) = self.current.take() {
                        self.credit(previous, now_secs);
                        self.last_switch_secs = now_secs;
                        TickOutcome::Blocked { flush: true }
                    } else {
                        self.last_switch_secs = now_secs;
                        TickOutcome::Blocked { flush: false }
                    }
                }
            };
        }

        if self.current.as_ref() == Some(&observed) {
            return TickOutcome::Unchanged;
        }

        let previous = self.current.take();
        let flush = previous.is_some();
        if let Some(previous) = previous {
            self.credit(previous, now_secs);
        }
        self.current = Some(observed);
        self.last_switch_secs = now_secs;
        TickOutcome::Switched { flush }
    }

    /// Materialise the open segment without switching away from `current`.
    ///
    /// Called once on shutdown so the final save includes the in-flight
    /// segment. Idempotent for a fixed `now_secs`.
    pub fn finalize(&mut self, now_secs: f64) {
        if let Some(current) = self.current.clone() {
            self.credit(current, now_secs);
            self.last_switch_secs = now_secs;
        }
    }

    /// Flip focus mode, returning the new value.
    ///
    /// Does not touch totals or the open segment: the currently-open segment
    /// is not retroactively reclassified.
    pub fn toggle_focus_mode(&mut self) -> bool {
        self.focus_mode = !self.focus_mode;
        self.focus_mode
    }

    /// Discard all recorded totals.
    ///
    /// `current` and the open segment are untouched, so tracking continues
    /// uninterrupted; only history is dropped.
    pub fn reset(&mut self) {
        self.usage.clear();
        self.order.clear();
    }

    /// Merge previously persisted totals into the ledger.
    ///
    /// Loaded values overwrite in-memory entries for the same key; in
    /// practice this only runs at startup against an empty ledger. Keys are
    /// inserted in sorted order so the first-seen order is deterministic
    /// regardless of map iteration order.
    pub fn merge_history(&mut self, loaded: HashMap<ApplicationId, UsageRecord>) {
        let mut entries: Vec<_> = loaded.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        for (app, record) in entries {
            if !self.usage.contains_key(&app) {
                self.order.push(app.clone());
            }
            self.usage.insert(app, record);
        }
    }

    // ── Views ─────────────────────────────────────────────────────────────

    /// Read-only view for presentation: current application, focus-mode flag,
    /// live open-segment length, and the top-`top_n` leaderboard.
    pub fn snapshot(&self, now_secs: f64, top_n: usize) -> LedgerSnapshot {
        let open_segment_secs = if self.current.is_some() {
            (now_secs - self.last_switch_secs).max(0.0)
        } else {
            0.0
        };

        // Stable sort over first-seen order gives deterministic ties.
        let mut top: Vec<(ApplicationId, f64)> = self
            .order
            .iter()
            .map(|app| (app.clone(), self.usage[app].duration))
            .collect();
        top.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        top.truncate(top_n);

        LedgerSnapshot {
            current: self.current.clone(),
            focus_mode: self.focus_mode,
            open_segment_secs,
            top,
        }
    }

    /// Authoritative accumulated totals, keyed by application.
    pub fn usage(&self) -> &HashMap<ApplicationId, UsageRecord> {
        &self.usage
    }

    pub fn current(&self) -> Option<&ApplicationId> {
        self.current.as_ref()
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Add the elapsed open segment to `app`, creating the record if absent.
    fn credit(&mut self, app: ApplicationId, now_secs: f64) {
        let delta = now_secs - self.last_switch_secs;
        let delta = if delta < 0.0 {
            tracing::warn!(
                app = %app,
                delta,
                "clock moved backwards; clamping segment to zero"
            );
            0.0
        } else {
            delta
        };

        if !self.usage.contains_key(&app) {
            self.order.push(app.clone());
        }
        self.usage.entry(app).or_default().duration += delta;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
