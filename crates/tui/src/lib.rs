//! # Flowdeck TUI Library
//!
//! Interactive terminal console for workflow executions, built on Ratatui.
//!
//! ## Key Features
//!
//! - Execution table with status filter tabs and progress
//! - Retry and cancel actions with a confirmation modal before cancelling
//! - Detail pane fetched on demand
//! - Toast notifications for action outcomes and failed refreshes
//! - Optional periodic auto-refresh
//!
//! ## Architecture
//!
//! Input is translated into `Msg`s, `App::update` applies them to the
//! execution controller and returns `Effect`s, and the runtime turns effects
//! into service calls whose results come back as further `Msg`s.

mod app;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use flowdeck_engine::ExecutionListController;
use flowdeck_util::UserPreferences;

/// Runs the console until the user quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be put into (or restored from)
/// raw mode or the alternate screen.
pub async fn run(controller: ExecutionListController, preferences: Arc<UserPreferences>) -> Result<()> {
    ui::runtime::run_app(controller, preferences).await
}
