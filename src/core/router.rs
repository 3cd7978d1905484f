//! File-type routing and discovery.
//!
//! Maps file extensions to [`FileType`] tags and walks an input
//! directory for files the pipeline can handle. Walk errors
//! (permission denied, dangling links) are logged and skipped
//! rather than aborting discovery.

use glob::Pattern;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, RagprepError};
use crate::core::types::FileType;

/// Extension lookup table shipped with ragprep
const DEFAULT_EXTENSIONS: &[(&str, FileType)] = &[
    ("pdf", FileType::Pdf),
    ("xlsx", FileType::Excel),
    ("xls", FileType::Excel),
    ("xlsm", FileType::Excel),
    ("md", FileType::Markdown),
    ("markdown", FileType::Markdown),
    ("mdown", FileType::Markdown),
    ("manus", FileType::Markdown),
];

/// Routes files to drivers by extension
#[derive(Debug, Clone)]
pub struct FileRouter {
    /// Lowercase extension (no dot) to file type
    extensions: BTreeMap<String, FileType>,

    /// Patterns to exclude (e.g., "**/~$*")
    exclude_patterns: Vec<Pattern>,
}

impl Default for FileRouter {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_patterns: Vec::new(),
        }
    }
}

fn default_extensions() -> BTreeMap<String, FileType> {
    DEFAULT_EXTENSIONS
        .iter()
        .map(|(ext, file_type)| (ext.to_string(), *file_type))
        .collect()
}

impl FileRouter {
    /// Create a router with the default extension map
    ///
    /// # Returns
    ///
    /// A new `FileRouter` or an error if an exclude pattern is
    /// invalid
    pub fn new(exclude_patterns: Vec<String>) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    RagprepError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions: default_extensions(),
            exclude_patterns: exclude,
        })
    }

    /// Map an extension to a file type, replacing any existing entry
    pub fn register_extension(&mut self, extension: &str, file_type: FileType) {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.extensions.insert(ext, file_type);
    }

    /// Determine the file type from the path's extension
    /// (case-insensitive). Unknown extensions yield `None`.
    pub fn classify(&self, path: &Path) -> Option<FileType> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extensions.get(&ext).copied()
    }

    /// Supported extensions, each with a leading dot
    pub fn supported_extensions(&self) -> BTreeSet<String> {
        self.extensions.keys().map(|ext| format!(".{ext}")).collect()
    }

    /// Collect every supported regular file under `root`
    ///
    /// Symlinks to files are followed; dangling links and
    /// directories are left out. Entries are visited in file-name
    /// order so the result is stable across runs.
    ///
    /// Directories whose name starts with `.` (`.git`, `.cache`, ...)
    /// are not descended into, unlike a plain recursive glob. Hidden
    /// files in visited directories are still considered.
    pub fn enumerate(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(RagprepError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        let mut unsupported = 0usize;

        for entry in WalkDir::new(root)
            .follow_links(false)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();

                    // is_file() follows symlinks, so dangling links
                    // and links to directories drop out here
                    if entry.file_type().is_dir() || !path.is_file() {
                        continue;
                    }

                    if self.classify(path).is_none() {
                        tracing::debug!("Unsupported extension: {:?}", path);
                        unsupported += 1;
                        continue;
                    }

                    if self.is_excluded(path) {
                        tracing::debug!("Skipping excluded file: {:?}", path);
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        if unsupported > 0 {
            tracing::info!(
                "Ignored {} files with unsupported extensions in {:?}",
                unsupported,
                root
            );
        }

        Ok(files)
    }

    /// Skip hidden directories, never the root itself
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        if path == root {
            return true;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') && entry.file_type().is_dir() {
                return false;
            }
        }

        true
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let file_name = path.file_name().and_then(|f| f.to_str());

        self.exclude_patterns.iter().any(|p| {
            p.matches_path(path) || file_name.map(|f| p.matches(f)).unwrap_or(false)
        })
    }
}
