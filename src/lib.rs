//! ragprep - Document Preprocessing for RAG
//!
//! Turns a directory of PDF, spreadsheet and Markdown files into a
//! single JSON knowledge base of overlapping, size-bounded text
//! chunks ready for embedding.
//!
//! # Architecture
//!
//! - **core**: Pipeline logic
//!   - config, error, types, xdg
//!   - chunker (separator-hierarchy splitter, overlap merger)
//!   - router (extension routing, directory discovery)
//!   - drivers (per-format extraction)
//!   - pipeline, storage (run orchestration, JSON output)
//!
//! - **cli**: Command-line interface (depends on core)
//!
//! # Key Features
//!
//! - Character-based chunk sizes (UTF-8 safe, never panics)
//! - Whole-unit overlap between consecutive chunks
//! - One corrupt file never aborts a run
//! - Reproducible output for unchanged input

// Core pipeline logic
pub mod core;

// Command-line interface
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{RagprepError, Result};
pub use core::pipeline::{Pipeline, RunReport, RunStatus};
pub use core::types::*;
