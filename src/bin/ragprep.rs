//! ragprep CLI - preprocess documents into a RAG knowledge base
//!
//! Logs go to stderr so `--format json` output on stdout stays
//! machine-readable. Set `RUST_LOG` to change verbosity and
//! `RAGPREP_LOG_FORMAT=json` for structured logs.
//!
//! # Examples
//!
//! ```bash
//! # Process files from ./data/raw into ./data/processed
//! ragprep process
//!
//! # Custom directories, smaller chunks
//! ragprep process -i ./documents -o ./out --chunk-size 500 --chunk-overlap 50
//!
//! # Look at how a single file is chunked
//! ragprep inspect ./documents/guide.md
//! ```

use clap::Parser;
use ragprep::cli::output::print_error;
use ragprep::cli::{exit_code, run, Cli};
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragprep=info"));

    let json = std::env::var("RAGPREP_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(exit_code::FAILURE);
        }
    }
}
