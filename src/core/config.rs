//! Configuration management for the ragprep pipeline.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! The resulting [`Config`] is built once per run and passed by
//! value into the chunker and the orchestrator.

use crate::core::error::{Result, RagprepError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Chunking configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character budget carried between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Split markers, coarsest first; "" means character level
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

/// Pipeline (run-level) configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Directory scanned for input documents
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory the knowledge base is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Name of the knowledge base file inside `output_dir`
    #[serde(default = "default_output_filename")]
    pub output_filename: String,

    /// Descend into subdirectories
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Glob patterns for files to leave out of discovery
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

// Default value functions
fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_separators() -> Vec<String> {
    vec![
        "\n\n---\n\n".to_string(), // Section breaks
        "\n\n".to_string(),        // Paragraphs
        "\n".to_string(),          // Lines
        ". ".to_string(),          // Sentences
        ", ".to_string(),          // Clauses
        " ".to_string(),           // Words
        String::new(),             // Characters
    ]
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data/raw")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data/processed")
}

fn default_output_filename() -> String {
    "knowledge_base.json".to_string()
}

fn default_recursive() -> bool {
    true
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        // Office lock files (~$Budget.xlsx)
        "**/~$*".to_string(),
    ]
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            separators: default_separators(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            output_filename: default_output_filename(),
            recursive: default_recursive(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl ChunkingConfig {
    /// Validate chunk sizes
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagprepError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(RagprepError::ConfigError(format!(
                "Chunk overlap ({}) must be less than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RagprepError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. RAGPREP_CONFIG env var
    /// 2. XDG config file (~/.config/ragprep/config.toml)
    /// 3. ./ragprep.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        xdg.log_paths();

        let mut config = if let Ok(config_path) = env::var("RAGPREP_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("ragprep.toml").exists() {
                Self::from_file("ragprep.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(chunk_size) = env::var("RAGPREP_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.chunking.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("RAGPREP_CHUNK_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.chunking.chunk_overlap = o;
            }
        }

        if let Ok(input_dir) = env::var("RAGPREP_INPUT_DIR") {
            self.pipeline.input_dir = PathBuf::from(input_dir);
        }
        if let Ok(output_dir) = env::var("RAGPREP_OUTPUT_DIR") {
            self.pipeline.output_dir = PathBuf::from(output_dir);
        }
        if let Ok(recursive) = env::var("RAGPREP_RECURSIVE") {
            if let Ok(r) = recursive.parse() {
                self.pipeline.recursive = r;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.pipeline.output_filename.trim().is_empty() {
            return Err(RagprepError::ConfigError(
                "Output filename must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.chunking.chunk_size);
        tracing::info!("  Chunk overlap: {} chars", self.chunking.chunk_overlap);
        tracing::info!("  Separators: {:?}", self.chunking.separators);
        tracing::info!("  Input dir: {:?}", self.pipeline.input_dir);
        tracing::info!("  Output dir: {:?}", self.pipeline.output_dir);
        tracing::info!("  Recursive: {}", self.pipeline.recursive);
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.pipeline.exclude_patterns.len()
        );
    }
}
