//! User-notification seam.
//!
//! Fire-and-forget, best-effort delivery: the engine decides *when* to
//! notify, never whether delivery succeeded.

use std::process::{Command, Stdio};

/// Delivers a short message to the user.
pub trait Notifier: Send {
    fn notify(&self, message: &str);
}

/// Desktop notifier that shells out to `notify-send` (or any compatible
/// program taking the message as its argument). Spawn failures are ignored.
pub struct DesktopNotifier {
    program: String,
}

impl DesktopNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("notify-send")
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str) {
        let result = Command::new(&self.program)
            .arg("apptrack")
            .arg(message)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = result {
            tracing::debug!(program = %self.program, error = %e, "notification delivery failed");
        }
    }
}

/// Notifier that writes the message to the log instead of the desktop.
/// Used as a headless fallback and in tests.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
