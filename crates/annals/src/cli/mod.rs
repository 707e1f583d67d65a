//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the annals binary.

mod commands;
mod generate;
mod readme;

pub use commands::{Cli, Commands, GlobalOptions};
pub use generate::{generate_chapter, show_next, show_prompt};
pub use readme::update_main_readme;

use annals::{AnnalsConfig, AnnalsResult, Book};

/// Loads configuration and the book named by the global options.
pub(crate) async fn load_book(options: &GlobalOptions) -> AnnalsResult<Book> {
    let config = AnnalsConfig::load(options.config.as_deref())?;
    Book::load(config, options.plan.as_deref()).await
}
