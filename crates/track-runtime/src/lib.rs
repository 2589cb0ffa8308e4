//! Runtime layer for apptrack.
//!
//! Owns the collaborator seams (active-window observation, user
//! notification), wires the usage ledger to durable storage, and runs the
//! polling loop that feeds the TUI through channels.

pub mod notify;
pub mod observer;
pub mod orchestrator;
pub mod tracker;

pub use track_core as core;
pub use track_data as data;
