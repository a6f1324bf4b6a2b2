//! Line cleaner: classify each line of the marked document and drop noise.
//!
//! ## Rules
//!
//! The text is split at every line boundary (see [`split_lines`]), each line
//! is trimmed, then checked in this order:
//!
//! 1. page footers such as `Page 2 of 3`
//! 2. bar-code IDs: exactly nine digits, optionally wrapped in `*`
//! 3. boilerplate: a configured prefix (`Name :`, `Lab No.`) or a configured
//!    marker anywhere in the line (`Modern Pathology Lab`)
//!
//! Everything else is kept, including blank lines and `--- Page N ---`
//! markers; the row parser ignores those on its own.

use crate::config::ExtractionConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_PAGE_FOOTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Page\s+\d+\s+of\s+\d+$").unwrap());

static RE_BARCODE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*?\d{9}\*?$").unwrap());

/// What a trimmed line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineClass {
    PageFooter,
    BarcodeId,
    Boilerplate,
    Keep,
}

/// Boilerplate rules for one run.
#[derive(Debug, Clone, Default)]
pub struct LineRules {
    pub prefixes: Vec<String>,
    pub markers: Vec<String>,
}

impl LineRules {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            prefixes: config.boilerplate_prefixes.clone(),
            markers: config.boilerplate_markers.clone(),
        }
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
            || self.markers.iter().any(|m| line.contains(m.as_str()))
    }
}

/// Classify one line. `line` must already be trimmed.
pub fn classify_line(line: &str, rules: &LineRules) -> LineClass {
    if RE_PAGE_FOOTER.is_match(line) {
        LineClass::PageFooter
    } else if RE_BARCODE_ID.is_match(line) {
        LineClass::BarcodeId
    } else if rules.is_boilerplate(line) {
        LineClass::Boilerplate
    } else {
        LineClass::Keep
    }
}

/// Surviving lines plus a count of what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedLines {
    pub lines: Vec<String>,
    pub seen: usize,
    pub footers: usize,
    pub barcodes: usize,
    pub boilerplate: usize,
}

/// Split `text` at every line boundary, `\r\n` counting as one.
///
/// Besides `\n` and `\r`, pdfium text can carry form feeds, the C1 next-line
/// and the Unicode line and paragraph separators; each of them ends a line.
/// A trailing boundary does not add an empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Trim every line of `text` and keep those classified [`LineClass::Keep`].
pub fn clean_lines(text: &str, rules: &LineRules) -> CleanedLines {
    let mut out = CleanedLines::default();
    for raw in split_lines(text) {
        out.seen += 1;
        let line = raw.trim();
        match classify_line(line, rules) {
            LineClass::PageFooter => out.footers += 1,
            LineClass::BarcodeId => out.barcodes += 1,
            LineClass::Boilerplate => out.boilerplate += 1,
            LineClass::Keep => out.lines.push(line.to_string()),
        }
    }
    out
}
