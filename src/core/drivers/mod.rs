//! Format drivers.
//!
//! A driver turns one file into a normalized [`Document`]. Drivers
//! are registered in a [`DriverRegistry`] keyed by [`FileType`], so
//! a new format only needs a `Driver` implementation and a router
//! extension entry.
//!
//! Contract for implementations:
//!
//! - empty files produce a `Document` with empty `content`, not an
//!   error
//! - `file_type` on the returned document must match
//!   [`Driver::file_type`]
//! - `content` is plain text

pub mod excel;
pub mod markdown;
pub mod pdf;

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::core::error::ExtractionError;
use crate::core::types::{Document, FileType};

pub use excel::SpreadsheetDriver;
pub use markdown::MarkdownDriver;
pub use pdf::PdfDriver;

/// Converts a file of one format into a [`Document`]
pub trait Driver: Send + Sync {
    /// Tag this driver produces
    fn file_type(&self) -> FileType;

    /// Extract a normalized document from `path`
    fn extract(&self, path: &Path) -> Result<Document, ExtractionError>;
}

/// Drivers keyed by the file type they handle
#[derive(Default)]
pub struct DriverRegistry {
    drivers: HashMap<FileType, Box<dyn Driver>>,
}

impl DriverRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the PDF, spreadsheet and Markdown drivers
    pub fn with_default_drivers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PdfDriver));
        registry.register(Box::new(SpreadsheetDriver));
        registry.register(Box::new(MarkdownDriver));
        registry
    }

    /// Add a driver, replacing any driver for the same file type
    pub fn register(&mut self, driver: Box<dyn Driver>) {
        self.drivers.insert(driver.file_type(), driver);
    }

    /// Driver for `file_type`, if one is registered
    pub fn get(&self, file_type: FileType) -> Option<&dyn Driver> {
        self.drivers.get(&file_type).map(|d| d.as_ref())
    }

    /// Registered file types, sorted
    pub fn file_types(&self) -> Vec<FileType> {
        let mut types: Vec<FileType> = self.drivers.keys().copied().collect();
        types.sort();
        types
    }
}

/// Run `driver` on `path`, turning a panic into an error
///
/// Parser crates can panic on malformed input. The panic message is
/// returned as [`ExtractionError::Panicked`].
pub fn extract_guarded(driver: &dyn Driver, path: &Path) -> Result<Document, ExtractionError> {
    panic::catch_unwind(AssertUnwindSafe(|| driver.extract(path)))
        .unwrap_or_else(|payload| Err(ExtractionError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Base name of `path` as a string
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
