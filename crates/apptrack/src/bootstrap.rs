use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.apptrack/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.apptrack/`
/// - `~/.apptrack/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let apptrack_dir = home.join(".apptrack");
    std::fs::create_dir_all(&apptrack_dir)?;
    std::fs::create_dir_all(apptrack_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// When `log_file` is given, output goes there instead of stderr; stderr is
/// unusable while the terminal is in raw mode anyway.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    // Accept Python-style level names (tracing uses lowercase).
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let subscriber = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_ansi(false)
                .with_writer(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(subscriber)
                .init();
        }
        None => {
            let subscriber = fmt::layer().with_target(false).with_thread_ids(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(subscriber)
                .init();
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        // Restore HOME.
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let apptrack_dir = tmp.path().join(".apptrack");
        assert!(apptrack_dir.is_dir(), ".apptrack dir must exist");
        assert!(apptrack_dir.join("logs").is_dir(), "logs subdir must exist");
    }

    #[test]
    fn test_setup_logging_creates_log_file_parent() {
        let tmp = TempDir::new().expect("tempdir");
        let log_path = tmp.path().join("nested").join("apptrack.log");

        // The global subscriber may already be set by another test; only the
        // directory side effect is asserted here.
        let _ = setup_logging("INFO", Some(&log_path));
        assert!(log_path.parent().unwrap().is_dir());
    }
}
