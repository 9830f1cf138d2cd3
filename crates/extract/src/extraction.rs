//! Text extraction service implementation
//!
//! This module provides the pluggable extraction pipeline through the
//! [`ExtractionService`] type. The service classifies a document (content
//! sniffing first, extension fallback) and dispatches its bytes to the
//! extractor registered for that kind.
//!
//! # Extraction Model
//!
//! - **Plain text** is decoded directly; the built-in [`PlainTextExtractor`]
//!   is always registered
//! - **Word and page documents** require a caller-installed extractor; with
//!   none installed, extraction fails with
//!   [`ExtractError::UnsupportedFormat`](crate::ExtractError::UnsupportedFormat)
//! - **Recognised-but-unmodelled binary formats** (images, archives, …) are
//!   rejected outright rather than decoded as garbage text
//!
//! The parser downstream only ever sees clean plain text; a failed
//! extraction means parsing is simply not attempted.

use crate::{DocumentKind, ExtractError};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Converts one document family's bytes into plain text
///
/// Implementations should return the complete text content in reading
/// order (pages and paragraphs concatenated). They must not silently
/// drop undecodable content; a document that cannot be decoded is a
/// [`ExtractError::MalformedDocument`] error.
pub trait TextExtractor {
    /// Extracts the complete text content of the document
    ///
    /// # Errors
    ///
    /// Returns `ExtractError` if the bytes cannot be decoded as this
    /// extractor's document family
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Extractor for plain-text documents
///
/// Decodes UTF-8, replacing invalid sequences rather than failing, since
/// prescription exports occasionally carry stray single-byte-encoded
/// characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Service turning prescription documents into plain text
///
/// The service owns document kind detection and a registry of extractors
/// keyed by [`DocumentKind`]. A fresh service handles plain text only;
/// callers install word/page extractors with [`ExtractionService::register`].
///
/// # Design
///
/// - Detection prefers magic bytes over the filename extension
/// - Extensionless, unsniffable content is treated as plain text
/// - The service implements `Debug` but not `Clone` (extractors are
///   single-owner boxed trait objects)
pub struct ExtractionService {
    /// Registered extractors, one per document kind
    extractors: HashMap<DocumentKind, Box<dyn TextExtractor + Send + Sync>>,
}

impl ExtractionService {
    /// Creates a service with the built-in plain-text extractor registered
    #[must_use]
    pub fn new() -> Self {
        let mut extractors: HashMap<DocumentKind, Box<dyn TextExtractor + Send + Sync>> =
            HashMap::new();
        extractors.insert(DocumentKind::PlainText, Box::new(PlainTextExtractor));

        Self { extractors }
    }

    /// Installs an extractor for a document kind
    ///
    /// Replaces any previously registered extractor for that kind. This is
    /// how callers add word-processor or page-document support.
    pub fn register(
        &mut self,
        kind: DocumentKind,
        extractor: Box<dyn TextExtractor + Send + Sync>,
    ) {
        self.extractors.insert(kind, extractor);
    }

    /// Reads a document from disk and extracts its text
    ///
    /// The filename extension participates in kind detection as a fallback
    /// when the content has no recognisable magic bytes.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError` if:
    /// - The file cannot be read (I/O)
    /// - The detected kind has no registered extractor
    /// - The registered extractor rejects the bytes
    pub fn extract_path(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path).map_err(|e| {
            ExtractError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read document {}: {}", path.display(), e),
            ))
        })?;

        self.extract(&bytes, Some(path))
    }

    /// Extracts text from in-memory document bytes
    ///
    /// Without a filename, detection relies on content sniffing alone;
    /// unsniffable bytes are treated as plain text.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError` if the detected kind has no registered
    /// extractor or the extractor rejects the bytes
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        self.extract(bytes, None)
    }

    fn extract(&self, bytes: &[u8], path: Option<&Path>) -> Result<String, ExtractError> {
        let kind = classify(bytes, path)?;

        let extractor = self
            .extractors
            .get(&kind)
            .ok_or_else(|| ExtractError::UnsupportedFormat(kind.to_string()))?;

        extractor.extract(bytes)
    }
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExtractionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&DocumentKind> = self.extractors.keys().collect();
        kinds.sort_by_key(|kind| kind.to_string());

        f.debug_struct("ExtractionService")
            .field("kinds", &kinds)
            .finish()
    }
}

/// Detects the document kind for a byte buffer
///
/// Magic bytes win over the extension: a PDF renamed to `.txt` is still a
/// page document. A sniffed format outside the modelled families is
/// rejected here, before any extractor runs.
fn classify(bytes: &[u8], path: Option<&Path>) -> Result<DocumentKind, ExtractError> {
    if let Some(sniffed) = infer::get(bytes) {
        return DocumentKind::from_mime(sniffed.mime_type())
            .ok_or_else(|| ExtractError::UnsupportedFormat(sniffed.mime_type().to_string()));
    }

    // No magic bytes: plain text unless the extension says otherwise
    Ok(path
        .and_then(DocumentKind::from_extension)
        .unwrap_or(DocumentKind::PlainText))
}
