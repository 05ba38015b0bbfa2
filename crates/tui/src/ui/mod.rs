//! UI rendering module for the TUI application.
//!
//! This module provides the main layout, the components it is composed of,
//! the theme, and the event loop that drives them.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
