//! Annals CLI binary.
//!
//! This binary provides command-line access to the book pipeline:
//! - Generate the next (or a given) chapter
//! - Rebuild the index page
//! - Inspect the next chapter and its prompt without calling the API

use annals::{ErrorClass, telemetry};
use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    use cli::{Cli, Commands, generate_chapter, show_next, show_prompt, update_main_readme};

    // Parse command-line arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(ErrorClass::InvalidArgument.exit_code())
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let dotenv_error = telemetry::load_dotenv(None);

    telemetry::init_logging(cli.verbose, cli.json_logs);
    if let Some(e) = dotenv_error {
        tracing::warn!(error = %e, "Ignoring unreadable .env file");
    }

    let options = cli.options();
    let result = match cli.command {
        Commands::GenerateChapter {
            chapter,
            update_index,
        } => generate_chapter(&options, chapter, update_index).await,
        Commands::UpdateMainReadme => update_main_readme(&options).await,
        Commands::Next => show_next(&options).await,
        Commands::Prompt { chapter, json } => show_prompt(&options, chapter, json).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let class = e.class();
            tracing::error!(class = %class, error = %e, "Command failed");
            eprintln!("❌ {}: {}", class, e);
            ExitCode::from(class.exit_code())
        }
    }
}
