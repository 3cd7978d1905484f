// Test helper functions

use ragprep::core::chunker::DocumentChunker;
use ragprep::core::config::{ChunkingConfig, Config};
use ragprep::core::types::{Document, FileType, KnowledgeBase, Metadata};
use std::path::Path;

/// Config pointing at the given directories with small chunks
#[allow(dead_code)] // Used in integration tests
pub fn test_config(input: &Path, output: &Path) -> Config {
    let mut config = Config::default();
    config.chunking.chunk_size = 120;
    config.chunking.chunk_overlap = 30;
    config.pipeline.input_dir = input.to_path_buf();
    config.pipeline.output_dir = output.to_path_buf();
    config
}

/// Chunker with explicit sizes and separators
#[allow(dead_code)] // Used in integration tests
pub fn chunker(chunk_size: usize, chunk_overlap: usize, separators: &[&str]) -> DocumentChunker {
    DocumentChunker::new(ChunkingConfig {
        chunk_size,
        chunk_overlap,
        separators: separators.iter().map(|s| s.to_string()).collect(),
    })
    .expect("valid chunking config")
}

/// In-memory Markdown document
#[allow(dead_code)] // Used in integration tests
pub fn document(filename: &str, content: &str) -> Document {
    Document {
        source: format!("data/raw/{filename}"),
        filename: filename.to_string(),
        file_type: FileType::Markdown,
        content: content.to_string(),
        metadata: Metadata::new(),
    }
}

/// Assert the knowledge base's counters agree with its contents
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_kb(kb: &KnowledgeBase) {
    let stats = &kb.metadata.statistics;

    assert!(
        kb.is_consistent(),
        "success summaries don't account for {} chunks",
        kb.chunks.len()
    );
    assert_eq!(
        stats.total_files_found,
        kb.metadata.file_summaries.len(),
        "one summary per discovered file"
    );
    assert_eq!(
        stats.files_processed + stats.files_errored + stats.files_skipped,
        stats.total_files_found,
        "every file has exactly one outcome"
    );

    for chunk in &kb.chunks {
        assert!(
            chunk.chunk_index < chunk.total_chunks,
            "chunk {} out of range",
            chunk.chunk_id
        );
    }
}
