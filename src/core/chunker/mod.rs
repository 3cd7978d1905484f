//! Document chunking.
//!
//! Turns a normalized [`Document`] into an ordered list of
//! [`Chunk`]s in two stages:
//!
//! - **splitter**: separator-hierarchy decomposition into units of
//!   at most `chunk_size` characters
//! - **merger**: greedy packing of units into chunks with whole-unit
//!   overlap
//!
//! All sizes are measured in characters, not bytes.

pub mod merger;
pub mod splitter;

use serde_json::Value;

use crate::core::config::ChunkingConfig;
use crate::core::error::Result;
use crate::core::types::{Chunk, ChunkConfig, Document};

/// Chunks documents with a fixed configuration.
///
/// # Example
///
/// ```
/// use ragprep::core::chunker::DocumentChunker;
/// use ragprep::core::config::ChunkingConfig;
/// use ragprep::core::types::{Document, FileType};
///
/// let chunker = DocumentChunker::new(ChunkingConfig::default()).unwrap();
/// let doc = Document {
///     source: "notes.md".to_string(),
///     filename: "notes.md".to_string(),
///     file_type: FileType::Markdown,
///     content: "Short note".to_string(),
///     metadata: Default::default(),
/// };
///
/// let chunks = chunker.chunk_document(&doc);
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].chunk_id, "notes.md_0");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentChunker {
    config: ChunkingConfig,
}

impl DocumentChunker {
    /// Create a chunker, rejecting invalid sizes up front.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.config.chunk_overlap
    }

    /// Parameters recorded in the knowledge base
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            chunk_size: self.config.chunk_size,
            chunk_overlap: self.config.chunk_overlap,
        }
    }

    /// Split text into chunk strings without building records.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let units = splitter::split(
            text,
            self.config.separators.as_slice(),
            self.config.chunk_size,
        );
        merger::merge(units.as_slice(), self.config.chunk_size, self.config.chunk_overlap)
    }

    /// Chunk a single document.
    ///
    /// Whitespace-only content yields no chunks. Every chunk carries
    /// the document metadata plus `chunk_size`, `chunk_overlap` and
    /// `char_count`; the chunk-level keys win on collision.
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        if document.content.trim().is_empty() {
            return Vec::new();
        }

        let texts = self.split_text(&document.content);
        let total_chunks = texts.len();

        texts
            .into_iter()
            .enumerate()
            .map(|(idx, content)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_size".to_string(), Value::from(self.config.chunk_size));
                metadata.insert(
                    "chunk_overlap".to_string(),
                    Value::from(self.config.chunk_overlap),
                );
                metadata.insert(
                    "char_count".to_string(),
                    Value::from(splitter::char_len(&content)),
                );

                Chunk {
                    chunk_id: format!("{}_{}", document.filename, idx),
                    chunk_index: idx,
                    total_chunks,
                    content,
                    source: document.source.clone(),
                    filename: document.filename.clone(),
                    file_type: document.file_type,
                    metadata,
                }
            })
            .collect()
    }

    /// Chunk several documents, flattening in input order.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunk_document(doc))
            .collect()
    }
}
