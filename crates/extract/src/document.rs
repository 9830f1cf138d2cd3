//! Document kind classification
//!
//! Prescription documents arrive as plain text exports, word-processor
//! files, or page-based scans. Classification prefers content sniffing
//! (magic bytes) over the filename extension, so a PDF renamed to `.txt`
//! is still treated as a page document.

use std::fmt;
use std::path::Path;

/// The document families the extraction service recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Plain text (also covers markdown and other bare-text exports)
    PlainText,

    /// Word-processor document (e.g. `.docx`)
    WordDocument,

    /// Page-based document (e.g. `.pdf`)
    PageDocument,
}

impl DocumentKind {
    /// Maps a sniffed MIME type to a document kind
    ///
    /// # Returns
    ///
    /// The matching kind, or `None` for MIME types outside the three
    /// families this crate models
    #[must_use]
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            "text/plain" => Some(Self::PlainText),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::WordDocument)
            }
            "application/pdf" => Some(Self::PageDocument),
            _ => None,
        }
    }

    /// Maps a filename extension to a document kind
    ///
    /// Extension matching is case-insensitive. Used as a fallback when
    /// content sniffing is inconclusive, which is the normal case for
    /// plain text (it has no magic bytes).
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "txt" | "md" => Some(Self::PlainText),
            "docx" => Some(Self::WordDocument),
            "pdf" => Some(Self::PageDocument),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PlainText => "plain text",
            Self::WordDocument => "word document",
            Self::PageDocument => "page document",
        };
        write!(f, "{}", label)
    }
}
