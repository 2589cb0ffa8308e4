//! Main application state and TUI event loop for apptrack.
//!
//! [`App`] owns the theme and the last received ledger snapshot. It drives
//! the terminal event loop, forwarding Reset / Toggle-focus commands to the
//! tracking loop and quitting on `q` / Ctrl+C.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use track_core::ledger::LedgerSnapshot;
use track_runtime::orchestrator::TrackerCommand;

use crate::themes::Theme;
use crate::usage_view::{self, UsageViewData};

// ── Key mapping ───────────────────────────────────────────────────────────────

/// User intent derived from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Reset,
    ToggleFocusMode,
}

/// Translate a raw key press into a [`KeyAction`], if it maps to one.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::Reset),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(KeyAction::ToggleFocusMode),
        _ => None,
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the apptrack TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Most recent ledger snapshot, `None` until the first data arrives.
    pub last_snapshot: Option<LedgerSnapshot>,
}

impl App {
    /// Construct a new application with the given theme name.
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            should_quit: false,
            last_snapshot: None,
        }
    }

    /// Run the TUI event loop, receiving snapshots from `rx` and forwarding
    /// commands through `cmd_tx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// that the terminal event loop stays on the current thread while
    /// snapshots arrive on the async channel via `try_recv`.
    ///
    /// The loop exits on `q`, `Q`, or Ctrl+C; the final history flush happens
    /// in the tracking loop's teardown once the command channel closes.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<LedgerSnapshot>,
        cmd_tx: mpsc::Sender<TrackerCommand>,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard events with a short timeout so we don't block.
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    match map_key(key.code, key.modifiers) {
                        Some(KeyAction::Quit) => break Ok(()),
                        Some(KeyAction::Reset) => {
                            let _ = cmd_tx.try_send(TrackerCommand::Reset);
                        }
                        Some(KeyAction::ToggleFocusMode) => {
                            let _ = cmd_tx.try_send(TrackerCommand::ToggleFocusMode);
                        }
                        None => {}
                    }
                }
            }

            // Drain any pending snapshots (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(snapshot) => self.last_snapshot = Some(snapshot),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match &self.last_snapshot {
            Some(snapshot) => {
                let data = view_data_from(snapshot);
                usage_view::render_usage_view(frame, area, &data, &self.theme);
            }
            None => usage_view::render_waiting(frame, area, &self.theme),
        }
    }
}

/// Convert a ledger snapshot into display-ready strings.
fn view_data_from(snapshot: &LedgerSnapshot) -> UsageViewData {
    UsageViewData {
        focus_mode: snapshot.focus_mode,
        current: snapshot.current.as_ref().map(|app| app.to_string()),
        open_segment_secs: snapshot.open_segment_secs,
        top: snapshot
            .top
            .iter()
            .map(|(app, secs)| (app.to_string(), *secs))
            .collect(),
        clock: chrono::Local::now().format("%H:%M:%S").to_string(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
