//! UI rendering module for skygaze
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod outlook;
pub mod search;

pub use outlook::render as render_outlook;
pub use outlook::render_loading;
pub use search::render as render_search;
