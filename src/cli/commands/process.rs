//! Process command - turn a directory of documents into a knowledge base

use crate::cli::output::{colors, format_bytes, format_duration, print_warning};
use crate::cli::{exit_code, OutputFormat};
use crate::core::config::Config;
use crate::core::pipeline::{Pipeline, RunReport, RunStatus};
use crate::core::types::FileOutcome;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Input directory containing raw files
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Output directory for the knowledge base
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Don't search subdirectories
    #[arg(long)]
    pub no_recursive: bool,

    /// Maximum chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap budget between chunks in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Only print the final summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl ProcessArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.pipeline.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.pipeline.output_dir = output.clone();
        }
        if self.no_recursive {
            config.pipeline.recursive = false;
        }
        if let Some(size) = self.chunk_size {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunking.chunk_overlap = overlap;
        }
    }
}

/// Execute the process command
///
/// # Returns
///
/// [`exit_code::SUCCESS`] when a knowledge base was written, or
/// [`exit_code::NO_FILES`] when there was nothing to process
pub async fn execute(
    args: ProcessArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    args.apply(&mut config);
    config.validate()?;
    config.log_config();

    let pipeline = Pipeline::new(&config)?;

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Processing {} (chunk size {}, overlap {})...",
            colors::file_path(&config.pipeline.input_dir.display().to_string()),
            colors::number(&config.chunking.chunk_size.to_string()),
            colors::number(&config.chunking.chunk_overlap.to_string())
        );
    }

    // Extraction is blocking file I/O
    let report = tokio::task::spawn_blocking(move || pipeline.run()).await??;

    match format {
        OutputFormat::Human => print_human(&report, &config, args.quiet),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(match report.status {
        RunStatus::Completed => exit_code::SUCCESS,
        RunStatus::Empty => exit_code::NO_FILES,
    })
}

fn print_human(report: &RunReport, config: &Config, quiet: bool) {
    if report.status == RunStatus::Empty {
        print_warning(&format!(
            "No supported files found in {}",
            config.pipeline.input_dir.display()
        ));
        return;
    }

    if !quiet {
        for summary in &report.file_summaries {
            match &summary.outcome {
                FileOutcome::Success { chunks_created } => println!(
                    "  {} {} {}",
                    colors::success("ok"),
                    summary.filename,
                    colors::dim(&format!("({chunks_created} chunks)"))
                ),
                FileOutcome::Error { error } => println!(
                    "  {} {} {}",
                    colors::error("error"),
                    summary.filename,
                    colors::dim(error)
                ),
                FileOutcome::Skipped { reason } => println!(
                    "  {} {} {}",
                    colors::warning("skipped"),
                    summary.filename,
                    colors::dim(reason)
                ),
            }
        }
    }

    let stats = &report.statistics;
    println!(
        "{} {}/{} files ({} chunks) in {}",
        colors::success("Processed"),
        colors::number(&stats.files_processed.to_string()),
        colors::number(&stats.total_files_found.to_string()),
        colors::number(&stats.total_chunks.to_string()),
        colors::number(&format_duration(report.duration_ms as f64 / 1000.0))
    );

    if stats.files_errored > 0 {
        println!(
            "{} {}",
            colors::error("Errors:"),
            colors::number(&stats.files_errored.to_string())
        );
    }

    if let Some(path) = &report.output_file {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        println!(
            "Output: {} ({})",
            colors::file_path(&path.display().to_string()),
            format_bytes(size)
        );
    }
}
