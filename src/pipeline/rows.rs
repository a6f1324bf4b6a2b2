//! Row parser: recover `test | value | unit | range` from a cleaned line.
//!
//! The built-in pattern reads a row as
//!
//! ```text
//! <test name> <number> <unit> <reference range>
//! ```
//!
//! where the test name is the shortest prefix that lets the rest of the line
//! match, the unit is letters plus `/ % μ .`, and the range is digits,
//! comparison signs, dots, dashes and spaces with an optional trailing unit.
//!
//! Lines are trimmed before they get here, so the range is effectively
//! required: `Age : 42 Years` or `Collected on 12 Jan` are not rows.
//! [`OPTIONAL_RANGE_ROW_PATTERN`] accepts rows without a range for reports
//! that print none.

use crate::config::ExtractionConfig;
use crate::error::LabReportError;
use crate::output::LabResult;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// The built-in row pattern.
pub const DEFAULT_ROW_PATTERN: &str = concat!(
    r"^(?P<test>.+?)",
    r"\s+(?P<value>[0-9.]+)",
    r"\s+(?P<unit>[a-zA-Z/%μgndL.]+)",
    r"\s+(?P<range>[<>=.\d\s\-]+[a-zA-Z/%μgndL.]*)?$",
);

/// Like [`DEFAULT_ROW_PATTERN`], but a line may end after the unit.
pub const OPTIONAL_RANGE_ROW_PATTERN: &str = concat!(
    r"^(?P<test>.+?)",
    r"\s+(?P<value>[0-9.]+)",
    r"\s+(?P<unit>[a-zA-Z/%μgndL.]+)",
    r"(?:\s+(?P<range>[<>=.\d\s\-]+[a-zA-Z/%μgndL.]*))?$",
);

/// Named groups a row pattern must define.
const REQUIRED_GROUPS: [&str; 3] = ["test", "value", "unit"];

static RE_DEFAULT_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(DEFAULT_ROW_PATTERN).unwrap());

static RE_OPTIONAL_RANGE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(OPTIONAL_RANGE_ROW_PATTERN).unwrap());

/// Compiled row pattern.
#[derive(Debug, Clone)]
pub struct RowParser {
    re: Regex,
}

impl Default for RowParser {
    fn default() -> Self {
        Self {
            re: RE_DEFAULT_ROW.clone(),
        }
    }
}

impl RowParser {
    /// Compile a user pattern; it must name the `test`, `value` and `unit`
    /// groups and may name `range`.
    pub fn with_pattern(pattern: &str) -> Result<Self, LabReportError> {
        let re = Regex::new(pattern)
            .map_err(|e| LabReportError::InvalidConfig(format!("Invalid row pattern: {e}")))?;
        let names: Vec<&str> = re.capture_names().flatten().collect();
        let missing: Vec<&str> = REQUIRED_GROUPS
            .iter()
            .copied()
            .filter(|g| !names.contains(g))
            .collect();
        if !missing.is_empty() {
            return Err(LabReportError::InvalidConfig(format!(
                "Row pattern is missing named group(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self { re })
    }

    /// Parser for one run: the configured pattern if any, else the built-in
    /// one, with or without a required range.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, LabReportError> {
        match (config.row_pattern.as_deref(), config.optional_range) {
            (Some(p), _) => Self::with_pattern(p),
            (None, true) => Ok(Self {
                re: RE_OPTIONAL_RANGE_ROW.clone(),
            }),
            (None, false) => Ok(Self::default()),
        }
    }

    /// Parse one line; `None` when it is not a result row.
    pub fn parse_line(&self, line: &str) -> Option<LabResult> {
        let caps = self.re.captures(line)?;
        let field = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        };
        let row = LabResult {
            test_name: field("test"),
            value: field("value"),
            unit: field("unit"),
            reference_range: field("range"),
        };
        trace!(?row, "row matched");
        Some(row)
    }

    /// Parse every line, keeping those that are rows, in order.
    pub fn parse_rows<S: AsRef<str>>(&self, lines: &[S]) -> Vec<LabResult> {
        lines
            .iter()
            .filter_map(|l| self.parse_line(l.as_ref()))
            .collect()
    }
}

/// Parse rows with the built-in pattern.
pub fn parse_rows<S: AsRef<str>>(lines: &[S]) -> Vec<LabResult> {
    RowParser::default().parse_rows(lines)
}
