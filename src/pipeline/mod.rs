//! Pipeline stages for lab-report extraction.
//!
//! Each submodule implements one step. Only `input`, `engine` and `text`
//! touch the file system or pdfium; `header`, `clean` and `rows` are pure
//! functions over strings, which is where the report-specific logic lives.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ text ──▶ header
//!             │
//!             └────▶ clean ──▶ rows
//! (path/URL) (pdfium)  (noise filter) (row regex)
//! ```
//!
//! 1. [`input`]   canonicalise the user-supplied path or URL to a local file
//! 2. [`engine`]  bind the pdfium library
//! 3. [`text`]    per-page text; runs in `spawn_blocking` because pdfium is
//!    not async-safe; joins pages with `--- Page N ---` markers
//! 4. [`header`]  patient name, age and gender from page 1
//! 5. [`clean`]   classify each line and drop footers, bar-code IDs and
//!    letterhead boilerplate
//! 6. [`rows`]    match the surviving lines against the row pattern

pub mod clean;
pub mod engine;
pub mod header;
pub mod input;
pub mod rows;
pub mod text;
