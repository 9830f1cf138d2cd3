//! Medminder Document Extraction
//!
//! This crate turns prescription documents into plain text for the
//! instruction parser in `medminder-core`.
//!
//! ## Design Principles
//!
//! - Document kind is detected from content first, filename second
//! - Extraction never guesses: a recognised binary format without an
//!   installed extractor fails loudly instead of producing garbled text
//! - Binary-format extractors are pluggable; the crate ships only the
//!   plain-text implementation
//!
//! ## Example Usage
//!
//! ```no_run
//! use medminder_extract::ExtractionService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ExtractionService::new();
//! let text = service.extract_path(Path::new("prescription.txt"))?;
//! # Ok(())
//! # }
//! ```

mod document;
mod extraction;

pub use document::DocumentKind;
pub use extraction::{ExtractionService, PlainTextExtractor, TextExtractor};

/// Errors that can occur during document extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No extractor is installed for the detected document format
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document bytes could not be decoded by the matching extractor
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
