//! Durable-storage layer for apptrack.
//!
//! Responsible for reading and writing the usage-history file: a single JSON
//! object mapping application names to accumulated durations, overwritten
//! wholesale on each save.

pub mod history;

pub use track_core as core;
