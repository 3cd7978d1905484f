//! Core pipeline logic (interface-agnostic)
//!
//! Everything the CLI drives lives here and can be used directly
//! as a library.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Documents, chunks and the knowledge base record
//! - **xdg**: XDG directory handling
//! - **chunker**: Separator-hierarchy splitting and chunk merging
//! - **router**: Extension routing and file discovery
//! - **drivers**: PDF, spreadsheet and Markdown extraction
//! - **pipeline**: Per-run orchestration
//! - **storage**: Knowledge base persistence

pub mod chunker;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pipeline;
pub mod router;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use chunker::DocumentChunker;
pub use config::Config;
pub use error::{RagprepError, Result};
pub use pipeline::{Pipeline, RunReport, RunStatus};
pub use router::FileRouter;
