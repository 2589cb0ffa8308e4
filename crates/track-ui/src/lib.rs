//! Terminal UI layer for apptrack.
//!
//! Provides themes, the usage dashboard (active application, leaderboard,
//! focus-mode banner, key-binding footer), and the main application event
//! loop built on top of [`ratatui`].

pub mod app;
pub mod themes;
pub mod usage_view;

pub use track_core as core;
