//! Tallgrass terminal front end
//!
//! Renders engine snapshots with ratatui and turns key presses into engine
//! commands through a tui-dispatch store. Exposed as a library for tests.

pub mod action;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod state;
pub mod ui;
