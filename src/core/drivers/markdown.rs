//! Markdown driver.
//!
//! Splits a Markdown file on `#`, `##` and `###` headers (headers
//! inside fenced code blocks are ignored), keeps the header line in
//! each section and prefixes the section with its header path, e.g.
//! `[Section: Guide > Install]`. Sections are joined with a `---`
//! rule so the chunker's coarsest separator falls between them.
//!
//! A `**METADATA:**` block followed by a fenced `json` block is
//! lifted out of the body and reported as `custom_metadata`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{file_name, Driver};
use crate::core::error::ExtractionError;
use crate::core::types::{Document, FileType, Metadata};

static METADATA_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*METADATA:\*\*\s*```json\s*([\s\S]*?)\s*```").unwrap());

/// Joins sections in the normalized content
pub const SECTION_BREAK: &str = "\n\n---\n\n";

/// Deepest header level that starts a new section
const MAX_HEADER_LEVEL: usize = 3;

/// Embedded metadata block, kept apart from malformed input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CustomMetadata {
    /// The block held valid JSON
    Parsed(Value),
    /// The block was not valid JSON; raw text preserved
    Raw(String),
}

/// A header-delimited piece of a Markdown file
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Header texts from `#` down to this section's level
    pub headers: Vec<String>,
    pub content: String,
}

/// Driver for `.md`, `.markdown`, `.mdown` and `.manus` files
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownDriver;

impl Driver for MarkdownDriver {
    fn file_type(&self) -> FileType {
        FileType::Markdown
    }

    fn extract(&self, path: &Path) -> Result<Document, ExtractionError> {
        let bytes = fs::read(path)?;
        let raw = String::from_utf8(bytes).map_err(|_| ExtractionError::InvalidUtf8)?;
        let raw = raw.trim_start_matches('\u{feff}');

        let (custom_metadata, body) = extract_metadata_block(raw);
        let sections = split_sections(&body);
        let content = render_sections(&sections);

        let mut metadata = Metadata::new();
        metadata.insert(
            "custom_metadata".to_string(),
            serde_json::to_value(&custom_metadata).unwrap_or(Value::Null),
        );
        metadata.insert("section_count".to_string(), Value::from(sections.len()));
        metadata.insert(
            "extraction_method".to_string(),
            Value::from("markdown header split"),
        );

        Ok(Document {
            source: path.display().to_string(),
            filename: file_name(path),
            file_type: FileType::Markdown,
            content,
            metadata,
        })
    }
}

/// Pull the first `**METADATA:**` block out of `content`.
///
/// Every matching block is removed from the returned body; only the
/// first one is parsed.
pub fn extract_metadata_block(content: &str) -> (Option<CustomMetadata>, String) {
    let Some(captures) = METADATA_BLOCK.captures(content) else {
        return (None, content.trim().to_string());
    };

    let raw = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    let metadata = match serde_json::from_str::<Value>(raw) {
        Ok(value) => CustomMetadata::Parsed(value),
        Err(e) => {
            tracing::debug!("Metadata block is not valid JSON: {}", e);
            CustomMetadata::Raw(raw.to_string())
        }
    };

    let body = METADATA_BLOCK.replace_all(content, "");
    (Some(metadata), body.trim().to_string())
}

/// Split Markdown into sections at `#`..`###` headers.
///
/// Sections with no text are dropped.
pub fn split_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut stack: Vec<(usize, String)> = Vec::new();
    let mut headers: Vec<String> = Vec::new();
    let mut lines: Vec<&str> = Vec::new();
    let mut fence: Option<&str> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            lines.push(line);
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            fence = Some(&trimmed[..3]);
            lines.push(line);
            continue;
        }

        if let Some((level, title)) = header(trimmed) {
            push_section(&mut sections, &headers, &lines);
            lines.clear();

            stack.retain(|(l, _)| *l < level);
            stack.push((level, title.to_string()));
            headers = stack.iter().map(|(_, t)| t.clone()).collect();
        }

        lines.push(line);
    }

    push_section(&mut sections, &headers, &lines);
    sections
}

fn push_section(sections: &mut Vec<Section>, headers: &[String], lines: &[&str]) {
    let content = lines.join("\n");
    let content = content.trim();
    if content.is_empty() {
        return;
    }

    sections.push(Section {
        headers: headers.to_vec(),
        content: content.to_string(),
    });
}

/// Header level and title for `#`, `##` or `###` lines
fn header(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end();
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > MAX_HEADER_LEVEL {
        return None;
    }

    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }

    Some((level, rest.trim()))
}

/// Render sections with their header path, joined by [`SECTION_BREAK`]
pub fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| {
            if section.headers.is_empty() {
                section.content.clone()
            } else {
                format!(
                    "[Section: {}]\n{}",
                    section.headers.join(" > "),
                    section.content
                )
            }
        })
        .collect::<Vec<_>>()
        .join(SECTION_BREAK)
}
