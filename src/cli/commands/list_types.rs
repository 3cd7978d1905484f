//! List-types command - show which extensions are processed

use crate::cli::output::{colors, print_header};
use crate::cli::OutputFormat;
use crate::core::router::FileRouter;
use crate::core::types::FileType;
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Arguments for the list-types command
#[derive(Args, Debug, Default)]
pub struct ListTypesArgs {}

/// One routed extension
#[derive(Debug, Serialize, PartialEq)]
pub struct ExtensionEntry {
    pub extension: String,
    pub file_type: FileType,
}

/// Supported extensions and the file type each routes to
pub fn extension_table(router: &FileRouter) -> Vec<ExtensionEntry> {
    router
        .supported_extensions()
        .into_iter()
        .filter_map(|extension| {
            let file_type = router.classify(Path::new(&format!("x{extension}")))?;
            Some(ExtensionEntry {
                extension,
                file_type,
            })
        })
        .collect()
}

/// Execute the list-types command
pub async fn execute(
    _args: ListTypesArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = extension_table(&FileRouter::default());

    match format {
        OutputFormat::Human => {
            print_header("Supported file types:");
            for file_type in FileType::all() {
                let extensions: Vec<&str> = entries
                    .iter()
                    .filter(|e| e.file_type == file_type)
                    .map(|e| e.extension.as_str())
                    .collect();
                println!(
                    "  {:<10} {}",
                    colors::file_type(file_type.as_str()),
                    extensions.join(" ")
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}
