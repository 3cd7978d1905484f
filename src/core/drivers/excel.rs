//! Spreadsheet driver.
//!
//! Tables embed poorly as raw grids, so every data row is rewritten
//! as a short list of sentences keyed by the row's most identifying
//! cell:
//!
//! ```text
//! ## Sheet: Budget
//!
//! **Item: Hearing aids**
//! - The unit cost is 1,250
//! - Notes: Covered twice a year
//! ```
//!
//! The first row of each sheet is the header. Sheets without data
//! rows are left out.

use calamine::{open_workbook_auto, Data, DataType, Reader};
use serde_json::Value;
use std::path::Path;

use super::{file_name, Driver};
use crate::core::error::ExtractionError;
use crate::core::types::{Document, FileType, Metadata};

/// Column-name fragments that mark a primary key column
const KEY_COLUMN_HINTS: &[&str] = &[
    "name", "id", "title", "item", "product", "category", "date", "period",
];

/// Column-name fragments rendered as `Column: value`
const DESCRIPTION_COLUMN_HINTS: &[&str] = &["description", "desc", "note", "comment", "remarks"];

/// Driver for `.xlsx`, `.xls` and `.xlsm` workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetDriver;

impl Driver for SpreadsheetDriver {
    fn file_type(&self) -> FileType {
        FileType::Excel
    }

    fn extract(&self, path: &Path) -> Result<Document, ExtractionError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ExtractionError::Spreadsheet(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let mut sheets = Vec::new();
        let mut total_rows = 0;

        for name in &sheet_names {
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| ExtractionError::Spreadsheet(format!("sheet '{name}': {e}")))?;

            let rows: Vec<&[Data]> = range.rows().collect();
            match linearize_sheet(name, &rows) {
                Some(sheet) => {
                    total_rows += sheet.rows;
                    sheets.push(sheet.text);
                }
                None => tracing::debug!("Sheet '{}' has no data rows", name),
            }
        }

        let mut metadata = Metadata::new();
        metadata.insert("sheet_count".to_string(), Value::from(sheet_names.len()));
        metadata.insert("sheet_names".to_string(), Value::from(sheet_names.clone()));
        metadata.insert("total_rows".to_string(), Value::from(total_rows));
        metadata.insert(
            "extraction_method".to_string(),
            Value::from("row linearization"),
        );

        Ok(Document {
            source: path.display().to_string(),
            filename: file_name(path),
            file_type: FileType::Excel,
            content: sheets.join("\n\n"),
            metadata,
        })
    }
}

/// A linearized sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetText {
    pub text: String,
    /// Data rows below the header
    pub rows: usize,
}

/// Linearize one sheet. `None` when the sheet has no data rows or
/// every data row is blank.
pub fn linearize_sheet<R: AsRef<[Data]>>(name: &str, rows: &[R]) -> Option<SheetText> {
    let (header, data) = rows.split_first()?;
    if data.is_empty() {
        return None;
    }

    let headers = column_names(header.as_ref());
    let rendered: Vec<String> = data
        .iter()
        .enumerate()
        .filter_map(|(i, row)| linearize_row(&headers, row.as_ref(), i + 1))
        .collect();

    if rendered.is_empty() {
        return None;
    }

    Some(SheetText {
        text: format!("## Sheet: {}\n\n{}", name, rendered.join("\n\n")),
        rows: data.len(),
    })
}

/// Header cells as column names; blank headers become `Column N`
fn column_names(header: &[Data]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| format_cell(cell).unwrap_or_else(|| format!("Column {}", i + 1)))
        .collect()
}

/// Render one data row. `row_number` is 1-based and used when no
/// key column has a value.
pub fn linearize_row(headers: &[String], row: &[Data], row_number: usize) -> Option<String> {
    let values: Vec<(usize, &str, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, column)| {
            let value = row.get(i).and_then(format_cell)?;
            Some((i, column.as_str(), value))
        })
        .collect();

    let key = values.iter().find(|(_, column, _)| {
        let lower = column.to_lowercase();
        KEY_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
    });

    let sentences: Vec<String> = values
        .iter()
        .filter(|(i, _, _)| key.map(|(k, _, _)| k != i).unwrap_or(true))
        .map(|(_, column, value)| format!("- {}", sentence(column, value)))
        .collect();

    if sentences.is_empty() {
        return None;
    }

    let title = match key {
        Some((_, column, value)) => format!("**{column}: {value}**"),
        None => format!("**Row: {row_number}**"),
    };

    Some(format!("{}\n{}", title, sentences.join("\n")))
}

fn sentence(column: &str, value: &str) -> String {
    let clean = column.replace(['_', '-'], " ");
    let lower = column.to_lowercase();

    if DESCRIPTION_COLUMN_HINTS.iter().any(|hint| lower.contains(hint)) {
        format!("{clean}: {value}")
    } else {
        format!("The {clean} is {value}")
    }
}

/// Display text for a cell, `None` for blanks and error cells
pub fn format_cell(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => group_thousands(&i.to_string()),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => cell.to_string(),
        },
        Data::DurationIso(d) => d.clone(),
    };

    (!text.is_empty()).then_some(text)
}

/// Whole floats print as integers; others keep two decimals
fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return group_thousands(&(value as i64).to_string());
    }

    let fixed = format!("{value:.2}");
    match fixed.split_once('.') {
        Some((whole, frac)) => format!("{}.{}", group_thousands(whole), frac),
        None => fixed,
    }
}

/// Insert `,` every three digits of an integer string
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}")
}
