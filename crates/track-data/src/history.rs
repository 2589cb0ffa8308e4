//! The on-disk usage-history store.
//!
//! The file format is a single JSON object mapping application names to
//! `{"duration": <seconds>}`, pretty-printed with 4-space indentation. Every
//! save overwrites the whole file via write-temp-then-rename so a crash can
//! never leave a half-written document behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use track_core::error::{Result, TrackError};
use track_core::model::{ApplicationId, UsageRecord};

/// Full-file JSON store for accumulated usage totals.
///
/// A single process is the only reader and writer; running two instances
/// against the same path produces lost updates (there is no file locking).
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the history file into a usage map.
    ///
    /// An absent file, a document whose top level is not an object, or a
    /// record missing its `duration` key all yield the empty map; malformed
    /// content is logged but never surfaced as an error.
    pub fn load(&self) -> HashMap<ApplicationId, UsageRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str(&content) {
            Ok(usage) => usage,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "history file is malformed; starting with empty usage"
                );
                HashMap::new()
            }
        }
    }

    /// Overwrite the history file with `usage`.
    ///
    /// Serialises with 4-space indentation, writes to a sibling temp file,
    /// then renames over the target.
    pub fn save(&self, usage: &HashMap<ApplicationId, UsageRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| TrackError::HistoryWrite {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        usage.serialize(&mut ser).map_err(TrackError::JsonParse)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &buf).map_err(|source| TrackError::HistoryWrite {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| TrackError::HistoryWrite {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
