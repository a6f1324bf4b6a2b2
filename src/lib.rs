//! # edgequake-labreport
//!
//! Extract lab-test results and patient header fields from the text layer of
//! PDF lab reports.
//!
//! Lab reports are generated from a handful of templates: a letterhead, a
//! patient block on page one, then one line per test with the value, the
//! unit and the reference range. This crate reads the text pdfium extracts
//! from each page, throws away the lines that are never results (footers,
//! bar-code IDs, letterhead) and matches the rest against a row pattern.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   resolve local file or download from URL
//!  ├─ 2. Text    per-page text via pdfium (spawn_blocking), page markers
//!  ├─ 3. Header  name / age / gender from page 1
//!  ├─ 4. Clean   drop footers, 9-digit IDs, boilerplate lines
//!  ├─ 5. Rows    test | value | unit | reference range
//!  └─ 6. Output  table, CSV, JSON, text dump
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_labreport::{extract, export, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("Blood_Report.pdf", &config).await?;
//!     println!("{}", output.header);
//!     print!("{}", export::render_table(&output.results, false));
//!     Ok(())
//! }
//! ```
//!
//! Text that was extracted elsewhere can go straight to [`parse_pages`] or
//! [`parse_text`]; neither needs pdfium.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2labs` binary (clap + anyhow + tracing-subscriber) |
//!
//! ## PDFium
//!
//! Text extraction needs the pdfium shared library at runtime. Point
//! `PDFIUM_LIB_PATH` at it, place it next to the executable, or install it
//! system-wide.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod reference;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageSelection};
pub use error::{LabReportError, PageError};
pub use extract::{
    extract, extract_from_bytes, extract_sync, extract_to_file, inspect, parse_pages, parse_text,
};
pub use output::{
    DocumentMetadata, ExtractionOutput, ExtractionStats, LabResult, PageText, ParsedReport,
    PatientHeader,
};
pub use reference::{RangeFlag, ReferenceRange};
