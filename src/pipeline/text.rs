//! Per-page text extraction via pdfium, and page-marker assembly.
//!
//! pdfium keeps thread-local state and must not run on a Tokio worker, so
//! every call that touches a document goes through `spawn_blocking`.
//! Metadata and page text come from one document load.

use crate::config::PageSelection;
use crate::error::LabReportError;
use crate::output::{DocumentMetadata, PageText};
use crate::pipeline::engine;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Format of the marker placed before each page's text.
pub fn page_marker(page_num: usize) -> String {
    format!("\n--- Page {page_num} ---\n")
}

/// Join pages into one document, each preceded by its page marker.
///
/// Pages without text are skipped: no marker, no content.
pub fn assemble_marked_text(pages: &[PageText]) -> String {
    pages
        .iter()
        .filter(|p| p.has_text())
        .fold(String::new(), |mut doc, page| {
            doc.push_str(&page_marker(page.page_num));
            doc.push_str(&page.text);
            doc
        })
}

/// Read metadata and the text of every selected page.
pub async fn extract_pages(
    pdf_path: &Path,
    password: Option<&str>,
    selection: &PageSelection,
) -> Result<(DocumentMetadata, Vec<PageText>), LabReportError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);
    let selection = selection.clone();

    tokio::task::spawn_blocking(move || {
        extract_pages_blocking(&path, password.as_deref(), &selection)
    })
    .await
    .map_err(|e| LabReportError::Internal(format!("Text extraction task panicked: {e}")))?
}

/// Read document metadata only.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, LabReportError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || -> Result<DocumentMetadata, LabReportError> {
        let pdfium = engine::bind_pdfium()?;
        let document = open_document(&pdfium, &path, password.as_deref())?;
        Ok(read_metadata(&document))
    })
    .await
    .map_err(|e| LabReportError::Internal(format!("Metadata task panicked: {e}")))?
}

fn extract_pages_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    selection: &PageSelection,
) -> Result<(DocumentMetadata, Vec<PageText>), LabReportError> {
    let pdfium = engine::bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    let metadata = read_metadata(&document);
    info!("PDF loaded: {} pages", metadata.page_count);

    let indices = selection.to_indices(metadata.page_count);
    if indices.is_empty() {
        return Err(LabReportError::PageOutOfRange {
            page: first_requested_page(selection),
            total: metadata.page_count,
        });
    }

    let pages = document.pages();
    let mut texts = Vec::with_capacity(indices.len());

    for idx in indices {
        let page_num = idx + 1;
        let page = match u16::try_from(idx).map(|i| pages.get(i)) {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!("Page {page_num}: could not be loaded: {e:?}");
                texts.push(PageText::failed(page_num, format!("{e:?}")));
                continue;
            }
            Err(_) => {
                warn!("Page {page_num}: index exceeds pdfium's page limit");
                texts.push(PageText::failed(page_num, "page index out of range"));
                continue;
            }
        };

        let text = match page.text() {
            Ok(text_page) => PageText::new(page_num, text_page.all()),
            Err(e) => {
                warn!("Page {page_num}: text extraction failed: {e:?}");
                PageText::failed(page_num, format!("{e:?}"))
            }
        };

        if text.has_text() {
            debug!("Page {page_num}: {} chars", text.text.len());
        } else {
            debug!("Page {page_num}: no text, skipped");
        }
        texts.push(text);
    }

    Ok((metadata, texts))
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, LabReportError> {
    pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path, password.is_some(), format!("{e:?}")))
}

/// Map a pdfium load failure onto the password / corrupt-file errors.
fn classify_load_error(path: &Path, had_password: bool, detail: String) -> LabReportError {
    let path: PathBuf = path.to_path_buf();
    if detail.to_lowercase().contains("password") {
        if had_password {
            LabReportError::WrongPassword { path }
        } else {
            LabReportError::PasswordRequired { path }
        }
    } else {
        LabReportError::CorruptPdf { path, detail }
    }
}

fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();
    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata
            .get(tag)
            .map(|t| t.value().trim().to_string())
            .filter(|v| !v.is_empty())
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

fn first_requested_page(selection: &PageSelection) -> usize {
    match selection {
        PageSelection::All => 0,
        PageSelection::Single(p) | PageSelection::Range(p, _) => *p,
        PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
    }
}
