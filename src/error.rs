//! Error types for the edgequake-labreport library.
//!
//! Two error types, two failure modes:
//!
//! * [`LabReportError`] is **fatal**: extraction cannot proceed (missing file,
//!   wrong password, no text layer anywhere, bad configuration). Returned as
//!   `Err(LabReportError)` from the top-level `extract*` functions.
//!
//! * [`PageError`] is **non-fatal**: one page yielded no text (scanned image,
//!   blank separator page) while the others are fine. Stored on
//!   [`crate::output::PageText`] so callers can see which pages were skipped.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-labreport library.
#[derive(Debug, Error)]
pub enum LabReportError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is neither a file path nor an HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// URL was valid but the report could not be downloaded.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file was read but does not start with the `%PDF` signature.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not parse the document.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// No selected page has a text layer; the report is probably scanned.
    #[error("No extractable text in '{path}' ({pages} pages checked).\nScanned reports need OCR first.")]
    NoTextFound { path: PathBuf, pages: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file (text dump, CSV, JSON).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the pdf2labs executable.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// pdfium failed to build the text page.
    #[error("Page {page}: text extraction failed: {detail}")]
    TextUnavailable { page: usize, detail: String },

    /// The page has no text layer (blank or image-only).
    #[error("Page {page}: no text")]
    Empty { page: usize },
}

impl PageError {
    /// 1-based page number the error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::TextUnavailable { page, .. } | PageError::Empty { page } => *page,
        }
    }
}
