//! Error types and error handling for the ragprep pipeline.
//!
//! Errors fall into two families. Setup errors (bad configuration,
//! unusable input/output directories) abort a run before any file
//! is touched. Per-file errors (unsupported type, extraction
//! failure) are recorded in the file's summary and never escalate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ragprep operations
pub type Result<T> = std::result::Result<T, RagprepError>;

/// Main error type for the ragprep pipeline
#[derive(Error, Debug)]
pub enum RagprepError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Extraction failed for {path:?}: {source}")]
    ExtractionFailed {
        path: PathBuf,
        #[source]
        source: ExtractionError,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Setup failed: {0}")]
    SetupFailed(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Error returned by a format driver
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("file is not valid UTF-8")]
    InvalidUtf8,

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("driver panicked: {0}")]
    Panicked(String),

    #[error("driver reported file type '{actual}' but '{expected}' was routed")]
    FileTypeMismatch { expected: String, actual: String },
}

impl RagprepError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error must abort the whole run
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            RagprepError::ConfigError(_)
                | RagprepError::SetupFailed(_)
                | RagprepError::TomlError(_)
        )
    }

    /// Check if this error only concerns a single input file
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            RagprepError::UnsupportedFile(_) | RagprepError::ExtractionFailed { .. }
        )
    }

    /// Check if the file was skipped rather than failed
    pub fn is_unsupported(&self) -> bool {
        matches!(self, RagprepError::UnsupportedFile(_))
    }
}
