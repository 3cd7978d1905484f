//! PDF driver.
//!
//! Text is pulled page by page with lopdf and each page is marked
//! with a `--- Page N ---` line. When lopdf cannot decode any page
//! the whole file is handed to pdf-extract, which copes with more
//! font encodings, and its form-feed page breaks are used instead.

use serde_json::Value;
use std::path::Path;

use super::{file_name, Driver};
use crate::core::error::ExtractionError;
use crate::core::types::{Document, FileType, Metadata};

/// Driver for `.pdf` files
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDriver;

impl Driver for PdfDriver {
    fn file_type(&self) -> FileType {
        FileType::Pdf
    }

    fn extract(&self, path: &Path) -> Result<Document, ExtractionError> {
        let doc = lopdf::Document::load(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        let pages = doc.get_pages();
        let page_count = pages.len();

        let mut texts = Vec::with_capacity(page_count);
        let mut failed = 0;
        for &number in pages.keys() {
            match doc.extract_text(&[number]) {
                Ok(text) => texts.push((number as usize, text)),
                Err(e) => {
                    tracing::debug!("Could not extract page {} of {:?}: {}", number, path, e);
                    failed += 1;
                }
            }
        }

        let method = if page_count > 0 && failed == page_count {
            tracing::debug!("Falling back to pdf-extract for {:?}", path);
            texts = fallback_pages(path)?;
            "pdf-extract"
        } else {
            "lopdf"
        };

        let mut metadata = Metadata::new();
        metadata.insert("page_count".to_string(), Value::from(page_count));
        metadata.insert("extraction_method".to_string(), Value::from(method));

        Ok(Document {
            source: path.display().to_string(),
            filename: file_name(path),
            file_type: FileType::Pdf,
            content: join_pages(&texts),
            metadata,
        })
    }
}

fn fallback_pages(path: &Path) -> Result<Vec<(usize, String)>, ExtractionError> {
    let text = pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(text
        .split('\u{000C}')
        .enumerate()
        .map(|(i, page)| (i + 1, page.to_string()))
        .collect())
}

/// Join page texts with page markers, leaving out blank pages
pub fn join_pages(pages: &[(usize, String)]) -> String {
    pages
        .iter()
        .filter_map(|(number, text)| {
            let text = text.trim();
            (!text.is_empty()).then(|| format!("--- Page {number} ---\n{text}"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
