//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Annals - generate a history book one chapter at a time
#[derive(Parser, Debug)]
#[command(name = "annals")]
#[command(about = "Generate a serialized history book one LLM-written chapter at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./annals.toml, ./config/config.json if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chapter plan file, overriding `paths.plan`
    #[arg(short, long, global = true)]
    pub plan: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl Cli {
    /// File locations shared by every command.
    pub fn options(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            plan: self.plan.clone(),
        }
    }
}

/// Options every handler receives.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Plan file override
    pub plan: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate the next chapter, or chapter N (regenerating it if it exists)
    #[command(name = "generate_chapter", visible_alias = "generate-chapter")]
    GenerateChapter {
        /// Chapter number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        chapter: Option<u32>,

        /// Rebuild the index page after writing the chapter
        #[arg(long)]
        update_index: bool,
    },

    /// Rebuild the index page from the plan and the chapters on disk
    #[command(name = "update_main_readme", visible_alias = "update-main-readme")]
    UpdateMainReadme,

    /// Show which chapter would be generated next
    Next,

    /// Print the prompt for the next chapter, or chapter N
    Prompt {
        /// Chapter number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        chapter: Option<u32>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
