//! Core domain layer for apptrack.
//!
//! Holds the application identity and usage model, the usage-accounting
//! ledger (the state machine that turns foreground observations into
//! per-application durations), duration formatting, CLI settings, and the
//! shared error type.

pub mod error;
pub mod formatting;
pub mod ledger;
pub mod model;
pub mod settings;
