//! Interactive catalog browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browser;
/// Browser state and key handling.
pub mod state;
mod ui;

pub use browser::run_browser;
