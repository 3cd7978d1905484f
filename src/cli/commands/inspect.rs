//! Inspect command - extract and chunk one file, print the result

use crate::cli::output::{colors, preview, print_header};
use crate::cli::OutputFormat;
use crate::core::chunker::DocumentChunker;
use crate::core::config::Config;
use crate::core::drivers::{extract_guarded, DriverRegistry};
use crate::core::router::FileRouter;
use crate::core::types::{Chunk, Document};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File to inspect
    pub file: PathBuf,

    /// Print full chunk contents instead of previews
    #[arg(long)]
    pub full: bool,
}

/// Inspection result
#[derive(Debug, Serialize)]
pub struct InspectResponse {
    pub document: Document,
    pub chunks: Vec<Chunk>,
}

/// Route, extract and chunk `path` with the given configuration
pub fn inspect_file(path: &Path, config: &Config) -> Result<InspectResponse, Box<dyn std::error::Error>> {
    let router = FileRouter::new(config.pipeline.exclude_patterns.clone())?;
    let file_type = router
        .classify(path)
        .ok_or_else(|| format!("Unsupported file type: {}", path.display()))?;

    let drivers = DriverRegistry::with_default_drivers();
    let driver = drivers
        .get(file_type)
        .ok_or_else(|| format!("No driver registered for {file_type}"))?;

    let document = extract_guarded(driver, path)?;
    let chunker = DocumentChunker::new(config.chunking.clone())?;
    let chunks = chunker.chunk_document(&document);

    Ok(InspectResponse { document, chunks })
}

/// Execute the inspect command
pub async fn execute(
    args: InspectArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.is_file() {
        return Err(format!("'{}' is not a file", args.file.display()).into());
    }

    let response = inspect_file(&args.file, config)?;

    match format {
        OutputFormat::Human => {
            let doc = &response.document;
            print_header(&doc.filename);
            println!("  type: {}", colors::file_type(doc.file_type.as_str()));
            println!(
                "  characters: {}",
                colors::number(&doc.content.chars().count().to_string())
            );
            for (key, value) in &doc.metadata {
                println!("  {}: {}", key, colors::dim(&value.to_string()));
            }

            println!(
                "  chunks: {}",
                colors::number(&response.chunks.len().to_string())
            );
            for chunk in &response.chunks {
                let body = if args.full {
                    chunk.content.clone()
                } else {
                    preview(&chunk.content, 72)
                };
                println!("\n{}", colors::label(&chunk.chunk_id));
                println!("{body}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
