//! Active-window observation seam.
//!
//! The engine treats the observer's output as an opaque string; how the
//! foreground application is resolved is a platform concern hidden behind
//! [`ActiveWindowObserver`]. The portable default shells out to an external
//! helper (e.g. `xdotool getwindowfocus getwindowclassname`) once per tick.

use std::process::Command;

use track_core::error::{Result, TrackError};
use track_core::model::ApplicationId;

/// Resolves the identity of the currently foregrounded application.
///
/// Implementations must return within the tick budget and map any failure to
/// the `Unknown` sentinel rather than an error.
pub trait ActiveWindowObserver: Send {
    fn observe(&mut self) -> ApplicationId;
}

// ── CommandObserver ───────────────────────────────────────────────────────────

/// Observer that runs an external command and reads the application name
/// from its first line of stdout.
///
/// Any spawn failure, non-zero exit, or empty output yields `Unknown`. The
/// first failure is logged at warn level so a missing helper binary is
/// visible; repeats are demoted to debug to keep the 500 ms cadence quiet.
pub struct CommandObserver {
    program: String,
    args: Vec<String>,
    reported_failure: bool,
}

impl CommandObserver {
    /// Build an observer from a whitespace-separated command line.
    pub fn new(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| TrackError::Observer("empty observe command".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
            reported_failure: false,
        })
    }

    fn log_failure(&mut self, reason: &str) {
        if self.reported_failure {
            tracing::debug!(program = %self.program, reason, "active-window lookup failed");
        } else {
            tracing::warn!(
                program = %self.program,
                reason,
                "active-window lookup failed; reporting Unknown (further failures logged at debug)"
            );
            self.reported_failure = true;
        }
    }
}

impl ActiveWindowObserver for CommandObserver {
    fn observe(&mut self) -> ApplicationId {
        let output = match Command::new(&self.program).args(&self.args).output() {
            Ok(output) => output,
            Err(e) => {
                self.log_failure(&e.to_string());
                return ApplicationId::unknown();
            }
        };

        if !output.status.success() {
            self.log_failure(&format!("exit status {}", output.status));
            return ApplicationId::unknown();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let name = stdout.lines().next().unwrap_or("").trim();
        if name.is_empty() {
            self.log_failure("empty output");
            return ApplicationId::unknown();
        }

        ApplicationId::new(name)
    }
}

// ── ScriptedObserver ──────────────────────────────────────────────────────────

/// Observer that replays a fixed sequence of identities, then repeats the
/// last one forever. Used in tests and demos.
pub struct ScriptedObserver {
    sequence: Vec<ApplicationId>,
    index: usize,
}

impl ScriptedObserver {
    pub fn new(sequence: Vec<ApplicationId>) -> Self {
        Self { sequence, index: 0 }
    }
}

impl ActiveWindowObserver for ScriptedObserver {
    fn observe(&mut self) -> ApplicationId {
        if self.sequence.is_empty() {
            return ApplicationId::unknown();
        }
        let i = self.index.min(self.sequence.len() - 1);
        self.index += 1;
        self.sequence[i].clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
