//! Extraction entry points.
//!
//! [`extract`] runs the whole pipeline on a path or URL. [`parse_pages`] is
//! the text-only half: it takes page text that was already extracted and
//! returns the header, the rows and the marked document, with no pdfium
//! involved.

use crate::config::ExtractionConfig;
use crate::error::LabReportError;
use crate::export;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageText, ParsedReport};
use crate::pipeline::clean::{self, LineRules};
use crate::pipeline::header;
use crate::pipeline::input;
use crate::pipeline::rows::RowParser;
use crate::pipeline::text;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run the text-level pipeline over already-extracted pages.
///
/// * header fields come from document page 1 only, when it has text
/// * pages without text contribute nothing
/// * rows are parsed from the cleaned lines of every page, in page order
pub fn parse_pages(
    pages: &[PageText],
    config: &ExtractionConfig,
) -> Result<ParsedReport, LabReportError> {
    let parser = RowParser::from_config(config)?;
    let rules = LineRules::from_config(config);

    let header = pages
        .iter()
        .find(|p| p.page_num == 1 && p.has_text())
        .map(|p| header::extract_header(&p.text))
        .unwrap_or_default();

    let marked_text = text::assemble_marked_text(pages);
    let cleaned = clean::clean_lines(&marked_text, &rules);
    debug!(
        "Cleaner kept {}/{} lines ({} footers, {} IDs, {} boilerplate)",
        cleaned.lines.len(),
        cleaned.seen,
        cleaned.footers,
        cleaned.barcodes,
        cleaned.boilerplate
    );

    let results = parser.parse_rows(&cleaned.lines);
    let pages_with_text = pages.iter().filter(|p| p.has_text()).count();

    let stats = ExtractionStats {
        total_pages: pages.len(),
        selected_pages: pages.len(),
        pages_with_text,
        empty_pages: pages.len() - pages_with_text,
        lines_seen: cleaned.seen,
        footer_lines: cleaned.footers,
        barcode_lines: cleaned.barcodes,
        boilerplate_lines: cleaned.boilerplate,
        rows_parsed: results.len(),
        ..Default::default()
    };

    Ok(ParsedReport {
        header,
        results,
        marked_text,
        stats,
    })
}

/// Parse a single block of text as if it were page 1 of a report.
pub fn parse_text(
    report_text: &str,
    config: &ExtractionConfig,
) -> Result<ParsedReport, LabReportError> {
    parse_pages(&[PageText::new(1, report_text)], config)
}

/// Extract header and rows from a PDF file or URL.
///
/// # Errors
/// - input problems (missing file, not a PDF, download failure)
/// - pdfium could not be bound or could not open the document
/// - the page selection is empty for this document
/// - no selected page has any text ([`LabReportError::NoTextFound`])
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, LabReportError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let source = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = source.path().to_path_buf();

    // ── Step 2: Page text ────────────────────────────────────────────────
    let extract_start = Instant::now();
    let (metadata, pages) =
        text::extract_pages(&pdf_path, config.password.as_deref(), &config.pages).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    for page in pages.iter().filter(|p| !p.has_text()) {
        if let Some(ref e) = page.error {
            warn!("{}", e);
        }
    }
    if !pages.iter().any(PageText::has_text) {
        return Err(LabReportError::NoTextFound {
            path: pdf_path,
            pages: pages.len(),
        });
    }

    // ── Step 3: Header, cleaner, rows ────────────────────────────────────
    let parsed = parse_pages(&pages, config)?;

    let stats = ExtractionStats {
        total_pages: metadata.page_count,
        extract_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        ..parsed.stats
    };

    info!(
        "Extraction complete: {} rows from {}/{} pages, {}ms total",
        stats.rows_parsed, stats.pages_with_text, stats.selected_pages, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        header: parsed.header,
        results: parsed.results,
        marked_text: parsed.marked_text,
        pages,
        metadata,
        stats,
    })
}

/// Extract and write the marked document text to `text_path`.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    text_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, LabReportError> {
    let output = extract(input_str, config).await?;
    export::write_text_dump(text_path.as_ref(), &output.marked_text).await?;
    Ok(output)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, LabReportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| LabReportError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(input_str, config))
}

/// Extract from PDF bytes held in memory.
///
/// The bytes are written to a managed temp file that is removed on return.
pub async fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, LabReportError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| LabReportError::Internal(format!("tempfile: {e}")))?;
    input::check_magic(tmp.path(), bytes)?;
    tmp.write_all(bytes)
        .map_err(|e| LabReportError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    extract(&path, config).await
}

/// Read PDF metadata without parsing any rows.
///
/// Only the password and the download timeout of `config` are used.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<DocumentMetadata, LabReportError> {
    let source = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    text::extract_metadata(source.path(), config.password.as_deref()).await
}
