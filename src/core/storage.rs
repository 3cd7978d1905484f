//! Knowledge base persistence.
//!
//! One run produces one pretty-printed JSON file. Non-ASCII text is
//! written as-is (UTF-8), so chunk content stays readable.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::core::types::KnowledgeBase;

/// Write `kb` to `dir/filename`, creating `dir` if needed.
///
/// An existing file is overwritten.
pub fn write_knowledge_base(dir: &Path, filename: &str, kb: &KnowledgeBase) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(filename);
    let mut json = serde_json::to_string_pretty(kb)?;
    json.push('\n');
    fs::write(&path, json)?;

    tracing::debug!("Wrote knowledge base to {:?}", path);
    Ok(path)
}

/// Load a knowledge base written by [`write_knowledge_base`]
pub fn read_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    let contents = fs::read_to_string(path)?;
    let kb: KnowledgeBase = serde_json::from_str(&contents)?;
    Ok(kb)
}
