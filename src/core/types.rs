//! Core data types for the ragprep pipeline.
//!
//! This module defines the records that flow through a run:
//! documents produced by drivers, chunks produced by the chunker,
//! and the knowledge base assembled by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form key/value facts attached to documents and chunks
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Format family a file is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Excel,
    Markdown,
}

impl FileType {
    /// Tag used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Excel => "excel",
            FileType::Markdown => "markdown",
        }
    }

    /// All known file types
    pub fn all() -> [FileType; 3] {
        [FileType::Pdf, FileType::Excel, FileType::Markdown]
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(FileType::Pdf),
            "excel" => Ok(FileType::Excel),
            "markdown" => Ok(FileType::Markdown),
            other => Err(format!("unknown file type '{other}'")),
        }
    }
}

/// A normalized document produced by a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Path the document was read from (provenance only)
    pub source: String,

    /// Base file name, used to build chunk identifiers
    pub filename: String,

    /// Driver that produced this document
    pub file_type: FileType,

    /// Full normalized text body
    pub content: String,

    /// Driver-specific facts, passed through to every chunk
    #[serde(default)]
    pub metadata: Metadata,
}

/// A single bounded-length segment of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `{filename}_{chunk_index}`
    pub chunk_id: String,

    /// Zero-based position within the document
    pub chunk_index: usize,

    /// Number of chunks the document produced
    pub total_chunks: usize,

    /// The chunk text
    pub content: String,

    /// Source path of the parent document
    pub source: String,

    /// Base name of the parent document
    pub filename: String,

    /// File type of the parent document
    pub file_type: FileType,

    /// Document metadata merged with chunk-level facts
    pub metadata: Metadata,
}

/// Chunking parameters recorded in the knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Number of files discovered
    pub total_files_found: usize,

    /// Number of files that produced a document
    pub files_processed: usize,

    /// Number of files whose extraction failed
    pub files_errored: usize,

    /// Number of files with no registered driver
    #[serde(default)]
    pub files_skipped: usize,

    /// Total chunks in the knowledge base
    pub total_chunks: usize,
}

/// What happened to a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Success { chunks_created: usize },
    Error { error: String },
    Skipped { reason: String },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }

    /// Chunks contributed to the knowledge base
    pub fn chunks_created(&self) -> usize {
        match self {
            FileOutcome::Success { chunks_created } => *chunks_created,
            _ => 0,
        }
    }
}

/// Per-file entry in the knowledge base metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub filename: String,

    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,

    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Run-level facts about a knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseMetadata {
    pub created_at: DateTime<Utc>,
    pub pipeline_version: String,
    pub source_directory: String,
    pub chunk_config: ChunkConfig,
    pub statistics: RunStatistics,
    pub file_summaries: Vec<FileSummary>,
}

/// The serialized output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub metadata: KnowledgeBaseMetadata,
    pub chunks: Vec<Chunk>,
}

impl KnowledgeBase {
    /// Check that successful summaries account for every chunk
    pub fn is_consistent(&self) -> bool {
        let summarized: usize = self
            .metadata
            .file_summaries
            .iter()
            .map(|s| s.outcome.chunks_created())
            .sum();

        summarized == self.chunks.len() && self.metadata.statistics.total_chunks == self.chunks.len()
    }
}
