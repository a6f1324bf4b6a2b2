//! Output types produced by an extraction.

use crate::error::PageError;
use crate::reference::{RangeFlag, ReferenceRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder printed for a header field that was not found.
pub const UNKNOWN: &str = "Unknown";

/// Patient header fields read from the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientHeader {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
}

impl PatientHeader {
    pub fn name_or_unknown(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn age_or_unknown(&self) -> &str {
        self.age.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn gender_or_unknown(&self) -> &str {
        self.gender.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for PatientHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "👤 Name: {}", self.name_or_unknown())?;
        writeln!(f, "🎂 Age: {}", self.age_or_unknown())?;
        write!(f, "⚧️ Gender: {}", self.gender_or_unknown())
    }
}

/// One parsed lab-test row.
///
/// Fields are kept as the report prints them; [`LabResult::flag`] interprets
/// the value against the reference range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabResult {
    #[serde(rename = "Test Name")]
    pub test_name: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    /// Empty when the row printed no range.
    #[serde(rename = "Reference Range")]
    pub reference_range: String,
}

impl LabResult {
    /// The value as a number, when it is one (`"."` or `"1.2.3"` are not).
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    /// Where the value sits relative to its reference range.
    pub fn flag(&self) -> RangeFlag {
        match (
            self.numeric_value(),
            ReferenceRange::parse(&self.reference_range),
        ) {
            (Some(v), Some(range)) => range.classify(v),
            _ => RangeFlag::Unknown,
        }
    }
}

/// Text of one page as pdfium returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based document page number.
    pub page_num: usize,
    pub text: String,
    /// Set when the page contributed nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PageError>,
}

impl PageText {
    pub fn new(page_num: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        // whitespace-only text still counts; only a page with no text at all is skipped
        let error = if text.is_empty() {
            Some(PageError::Empty { page: page_num })
        } else {
            None
        };
        Self {
            page_num,
            text,
            error,
        }
    }

    pub fn failed(page_num: usize, detail: impl Into<String>) -> Self {
        Self {
            page_num,
            text: String::new(),
            error: Some(PageError::TextUnavailable {
                page: page_num,
                detail: detail.into(),
            }),
        }
    }

    pub fn has_text(&self) -> bool {
        self.error.is_none()
    }
}

/// Document-level metadata read by pdfium.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub total_pages: usize,
    pub selected_pages: usize,
    pub pages_with_text: usize,
    pub empty_pages: usize,
    pub lines_seen: usize,
    pub footer_lines: usize,
    pub barcode_lines: usize,
    pub boilerplate_lines: usize,
    pub rows_parsed: usize,
    pub extract_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ExtractionStats {
    pub fn lines_dropped(&self) -> usize {
        self.footer_lines + self.barcode_lines + self.boilerplate_lines
    }
}

/// The text-level result of the pipeline: everything derived from page text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedReport {
    pub header: PatientHeader,
    pub results: Vec<LabResult>,
    /// All page text joined with `--- Page N ---` markers.
    pub marked_text: String,
    pub stats: ExtractionStats,
}

/// Full output of [`crate::extract`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub header: PatientHeader,
    pub results: Vec<LabResult>,
    pub marked_text: String,
    pub pages: Vec<PageText>,
    pub metadata: DocumentMetadata,
    pub stats: ExtractionStats,
}
