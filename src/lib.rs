//! EV depot charging simulator: baseline vs power-capped greedy scheduling
//! and the tariff savings between them.

/// REST API over a finished run.
#[cfg(feature = "api")]
pub mod api;
/// TOML configuration and presets.
pub mod config;
/// Session ingest and result export.
pub mod io;
pub mod runner;
/// Time grid, tariff, simulators, costs and comparison.
pub mod sim;
pub mod synth;
/// Terminal dashboard.
#[cfg(feature = "tui")]
pub mod tui;
