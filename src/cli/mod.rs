//! CLI adapter for ragprep
//!
//! Thin clap layer over `core/`. Each subcommand lives in its own
//! module under `commands/`; this module only parses, loads the
//! configuration and dispatches.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::core::config::Config;

/// Exit statuses returned by [`run`]
pub mod exit_code {
    /// Run completed (individual files may still have failed)
    pub const SUCCESS: i32 = 0;
    /// Setup or other fatal error
    pub const FAILURE: i32 = 1;
    /// No supported files were found
    pub const NO_FILES: i32 = 2;
}

/// ragprep - Document preprocessing for RAG
///
/// Extracts text from PDF, spreadsheet and Markdown files, splits it
/// into overlapping chunks and writes a single JSON knowledge base.
#[derive(Parser, Debug)]
#[command(name = "ragprep")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Document preprocessing pipeline for RAG", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a directory into a knowledge base
    Process(commands::ProcessArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// List supported file extensions
    #[command(name = "list-types")]
    ListTypes(commands::ListTypesArgs),

    /// Extract and chunk a single file without writing output
    Inspect(commands::InspectArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  ragprep completions bash > ~/.local/share/bash-completion/completions/ragprep
    ///   zsh:   ragprep completions zsh > ~/.zfunc/_ragprep
    ///   fish:  ragprep completions fish > ~/.config/fish/completions/ragprep.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
///
/// # Returns
///
/// The process exit status (see [`exit_code`])
pub async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    // Completions and type listing don't need configuration
    match cli.command {
        Commands::Completions(args) => {
            commands::completions::execute(args)?;
            return Ok(exit_code::SUCCESS);
        }
        Commands::ListTypes(args) => {
            commands::list_types::execute(args, cli.format).await?;
            return Ok(exit_code::SUCCESS);
        }
        _ => {}
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Process(args) => commands::process::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &config, cli.format).await?;
            Ok(exit_code::SUCCESS)
        }
        Commands::Inspect(args) => {
            commands::inspect::execute(args, &config, cli.format).await?;
            Ok(exit_code::SUCCESS)
        }
        Commands::Completions(_) | Commands::ListTypes(_) => unreachable!(), // Handled above
    }
}
