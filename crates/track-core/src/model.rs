use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel value used when the foreground application cannot be resolved.
pub const UNKNOWN_APPLICATION: &str = "Unknown";

/// Opaque, case-sensitive identifier for an application.
///
/// Typically an executable or window-class name reported by the platform
/// observer. Equality is exact string match; the [`UNKNOWN_APPLICATION`]
/// sentinel is an ordinary identity that accrues duration like any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Wrap a raw name reported by an observer.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `Unknown` sentinel.
    pub fn unknown() -> Self {
        Self(UNKNOWN_APPLICATION.to_string())
    }

    /// `true` when this identity is the `Unknown` sentinel.
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_APPLICATION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Accumulated active time for a single application.
///
/// `duration` is a **required** key in the on-disk JSON: a record missing it
/// invalidates the whole document, which the store treats as a parse failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Accumulated active time in seconds. Never negative.
    pub duration: f64,
}

impl UsageRecord {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }
}
