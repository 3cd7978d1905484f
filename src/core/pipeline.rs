//! Pipeline orchestration.
//!
//! Coordinates one preprocessing run:
//! 1. Prepare input and output directories
//! 2. Discover supported files
//! 3. Extract and chunk each file, one at a time
//! 4. Assemble and write the knowledge base
//!
//! A file that fails to extract is recorded in its summary and the
//! run moves on. Only setup problems abort a run.

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::chunker::DocumentChunker;
use crate::core::config::{Config, PipelineConfig};
use crate::core::drivers::{extract_guarded, file_name, DriverRegistry};
use crate::core::error::{ExtractionError, RagprepError, Result};
use crate::core::router::FileRouter;
use crate::core::storage;
use crate::core::types::{
    Chunk, FileOutcome, FileSummary, KnowledgeBase, KnowledgeBaseMetadata, RunStatistics,
};

/// Version recorded in every knowledge base
pub const PIPELINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Files were processed and a knowledge base was written
    Completed,
    /// Nothing to process; no knowledge base was written
    Empty,
}

/// Result of [`Pipeline::run`]
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub statistics: RunStatistics,
    pub file_summaries: Vec<FileSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    pub duration_ms: u64,
}

impl RunReport {
    fn empty(start: Instant) -> Self {
        Self {
            status: RunStatus::Empty,
            statistics: RunStatistics::default(),
            file_summaries: Vec::new(),
            output_file: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Orchestrates a preprocessing run
pub struct Pipeline {
    config: PipelineConfig,
    chunker: DocumentChunker,
    router: FileRouter,
    drivers: DriverRegistry,
}

impl Pipeline {
    /// Create a pipeline with the built-in drivers
    ///
    /// # Returns
    ///
    /// A new `Pipeline`, or a configuration error if the chunk
    /// sizes or exclude patterns are invalid
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_drivers(config, DriverRegistry::with_default_drivers())
    }

    /// Create a pipeline with a custom driver registry
    pub fn with_drivers(config: &Config, drivers: DriverRegistry) -> Result<Self> {
        let chunker = DocumentChunker::new(config.chunking.clone())?;
        let router = FileRouter::new(config.pipeline.exclude_patterns.clone())?;

        Ok(Self {
            config: config.pipeline.clone(),
            chunker,
            router,
            drivers,
        })
    }

    /// Router used for discovery, e.g. to register extra extensions
    pub fn router_mut(&mut self) -> &mut FileRouter {
        &mut self.router
    }

    /// Run against the configured input directory
    ///
    /// A missing input directory is created and the run ends
    /// [`RunStatus::Empty`]. Failing to create either directory is a
    /// setup error.
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let input_dir = &self.config.input_dir;
        let output_dir = &self.config.output_dir;

        if !input_dir.exists() {
            tracing::warn!("Input directory not found, creating {:?}", input_dir);
            fs::create_dir_all(input_dir).map_err(|e| {
                RagprepError::SetupFailed(format!(
                    "cannot create input directory {input_dir:?}: {e}"
                ))
            })?;
            return Ok(RunReport::empty(start));
        }

        if !input_dir.is_dir() {
            return Err(RagprepError::SetupFailed(format!(
                "input path {input_dir:?} is not a directory"
            )));
        }

        fs::create_dir_all(output_dir).map_err(|e| {
            RagprepError::SetupFailed(format!(
                "cannot create output directory {output_dir:?}: {e}"
            ))
        })?;
        let output_path = output_dir.join(&self.config.output_filename);
        check_writable(&output_path)?;

        tracing::info!("Starting file discovery in {:?}", input_dir);
        let files = self.router.enumerate(input_dir, self.config.recursive)?;

        if files.is_empty() {
            tracing::warn!("No supported files found in {:?}", input_dir);
            return Ok(RunReport::empty(start));
        }
        tracing::info!("Found {} files to process", files.len());

        let kb = self.build_knowledge_base(input_dir, &files);
        let output_file =
            storage::write_knowledge_base(output_dir, &self.config.output_filename, &kb)
                .map_err(|e| match e {
                    RagprepError::IoError(e) => RagprepError::SetupFailed(format!(
                        "cannot write knowledge base {output_path:?}: {e}"
                    )),
                    other => other,
                })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let stats = &kb.metadata.statistics;
        tracing::info!(
            "Run complete: {}/{} files processed, {} errored, {} skipped, \
             {} chunks in {}ms",
            stats.files_processed,
            stats.total_files_found,
            stats.files_errored,
            stats.files_skipped,
            stats.total_chunks,
            duration_ms
        );
        tracing::info!("Knowledge base written to {:?}", output_file);

        Ok(RunReport {
            status: RunStatus::Completed,
            statistics: kb.metadata.statistics,
            file_summaries: kb.metadata.file_summaries,
            output_file: Some(output_file),
            duration_ms,
        })
    }

    /// Process `files` in order and assemble a knowledge base
    ///
    /// Never fails: each file's problem ends up in its summary.
    pub fn build_knowledge_base(&self, source_directory: &Path, files: &[PathBuf]) -> KnowledgeBase {
        warn_duplicate_names(files);

        let mut chunks = Vec::new();
        let mut summaries = Vec::with_capacity(files.len());
        let mut stats = RunStatistics {
            total_files_found: files.len(),
            ..RunStatistics::default()
        };

        for (idx, path) in files.iter().enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} files processed", idx, files.len());
            }

            let outcome = match self.process_file(path) {
                Ok(file_chunks) => {
                    tracing::debug!("Processed {:?} ({} chunks)", path, file_chunks.len());
                    stats.files_processed += 1;
                    let chunks_created = file_chunks.len();
                    chunks.extend(file_chunks);
                    FileOutcome::Success { chunks_created }
                }
                Err(e) if e.is_unsupported() => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    stats.files_skipped += 1;
                    FileOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to process {:?}: {}", path, e);
                    stats.files_errored += 1;
                    FileOutcome::Error {
                        error: e.to_string(),
                    }
                }
            };

            summaries.push(FileSummary {
                filename: file_name(path),
                source: path.display().to_string(),
                file_type: self.router.classify(path),
                outcome,
            });
        }

        stats.total_chunks = chunks.len();

        KnowledgeBase {
            metadata: KnowledgeBaseMetadata {
                created_at: Utc::now(),
                pipeline_version: PIPELINE_VERSION.to_string(),
                source_directory: source_directory.display().to_string(),
                chunk_config: self.chunker.chunk_config(),
                statistics: stats,
                file_summaries: summaries,
            },
            chunks,
        }
    }

    /// Route, extract and chunk a single file
    fn process_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let file_type = self
            .router
            .classify(path)
            .ok_or_else(|| RagprepError::UnsupportedFile(path.display().to_string()))?;

        let driver = self.drivers.get(file_type).ok_or_else(|| {
            RagprepError::UnsupportedFile(format!("no driver registered for {file_type}"))
        })?;

        let document =
            extract_guarded(driver, path).map_err(|source| RagprepError::ExtractionFailed {
                path: path.to_path_buf(),
                source,
            })?;

        if document.file_type != file_type {
            return Err(RagprepError::ExtractionFailed {
                path: path.to_path_buf(),
                source: ExtractionError::FileTypeMismatch {
                    expected: file_type.to_string(),
                    actual: document.file_type.to_string(),
                },
            });
        }

        Ok(self.chunker.chunk_document(&document))
    }
}

/// Fail before any file is processed if the knowledge base could
/// not be written to `path`
///
/// An existing file is opened without truncation. A file created by
/// the check is removed again so an empty run leaves nothing behind.
fn check_writable(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(RagprepError::SetupFailed(format!(
            "output path {path:?} is a directory"
        )));
    }

    let existed = path.exists();
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map_err(|e| {
            RagprepError::SetupFailed(format!("output path {path:?} is not writable: {e}"))
        })?;

    if !existed {
        if let Err(e) = fs::remove_file(path) {
            tracing::debug!("Could not remove write check file {:?}: {}", path, e);
        }
    }

    Ok(())
}

/// Chunk ids are built from base names, so files sharing one
/// produce colliding ids
fn warn_duplicate_names(files: &[PathBuf]) {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for path in files {
        *seen.entry(file_name(path)).or_default() += 1;
    }

    for (name, count) in seen.iter().filter(|(_, count)| **count > 1) {
        tracing::warn!(
            "{} files are named {:?}; their chunk ids will collide",
            count,
            name
        );
    }
}
