use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by apptrack.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The history file could not be opened or read from disk.
    #[error("Failed to read history file {path}: {source}")]
    HistoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The history file could not be written or replaced.
    #[error("Failed to write history file {path}: {source}")]
    HistoryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or serialised.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The active-window observer could not be constructed or invoked.
    #[error("Observer error: {0}")]
    Observer(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the apptrack crates.
pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_history_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = TrackError::HistoryRead {
            path: PathBuf::from("/some/history.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read history file"));
        assert!(msg.contains("/some/history.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_history_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TrackError::HistoryWrite {
            path: PathBuf::from("/ro/history.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write history file"));
        assert!(msg.contains("/ro/history.json"));
    }

    #[test]
    fn test_error_display_observer() {
        let err = TrackError::Observer("empty command".to_string());
        assert_eq!(err.to_string(), "Observer error: empty command");
    }

    #[test]
    fn test_error_display_terminal() {
        let err = TrackError::Terminal("crossterm failure".to_string());
        assert_eq!(err.to_string(), "Terminal error: crossterm failure");
    }

    #[test]
    fn test_error_display_config() {
        let err = TrackError::Config("invalid poll interval".to_string());
        assert_eq!(err.to_string(), "Configuration error: invalid poll interval");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TrackError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: TrackError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
