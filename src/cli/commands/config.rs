//! Config command - show current configuration

use crate::cli::output::print_header;
use crate::cli::OutputFormat;
use crate::core::config::{ChunkingConfig, Config, PipelineConfig};
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Also show the chunk separators
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    pub chunking: &'a ChunkingConfig,
    pub pipeline: &'a PipelineConfig,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let xdg = XdgDirs::new();

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        chunking: &config.chunking,
        pipeline: &config.pipeline,
    };

    match format {
        OutputFormat::Human => {
            print_header("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  chunking:");
            println!("    chunk_size: {}", response.chunking.chunk_size);
            println!("    chunk_overlap: {}", response.chunking.chunk_overlap);
            if args.all {
                println!("    separators: {:?}", response.chunking.separators);
            }
            println!("  pipeline:");
            println!("    input_dir: {}", response.pipeline.input_dir.display());
            println!("    output_dir: {}", response.pipeline.output_dir.display());
            println!("    output_filename: {}", response.pipeline.output_filename);
            println!("    recursive: {}", response.pipeline.recursive);
            println!(
                "    exclude_patterns: {:?}",
                response.pipeline.exclude_patterns
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
