//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod compile;
mod completions;
mod config;
mod resolve;
mod utils;

pub use compile::handle_compile;
pub use completions::handle_completions;
pub use config::handle_config;
pub use resolve::handle_resolve;
