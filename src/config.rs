//! Configuration types for lab-report extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built via
//! [`ExtractionConfigBuilder`]. Defaults reproduce the layout of the reports
//! this crate was written against; the builder lets callers adapt the
//! boilerplate rules and the row pattern to another lab's template.

use crate::error::LabReportError;
use crate::pipeline::rows::RowParser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Line prefixes that mark patient-info and lab-address lines.
pub const DEFAULT_BOILERPLATE_PREFIXES: &[&str] = &["Name :", "Lab No."];

/// Substrings that mark letterhead lines anywhere on a page.
pub const DEFAULT_BOILERPLATE_MARKERS: &[&str] = &["Modern Pathology Lab"];

/// Configuration for a lab-report extraction.
///
/// # Example
/// ```rust
/// use edgequake_labreport::{ExtractionConfig, PageSelection};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageSelection::Range(1, 3))
///     .boilerplate_marker("City Diagnostics")
///     .build()
///     .unwrap();
/// assert_eq!(config.boilerplate_markers.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Pages to read. Default: all pages.
    ///
    /// Patient header fields are only read from document page 1, so a
    /// selection that skips page 1 reports every header field as unknown.
    pub pages: PageSelection,

    /// PDF user password for encrypted reports.
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// A trimmed line starting with any of these is dropped.
    pub boilerplate_prefixes: Vec<String>,

    /// A trimmed line containing any of these is dropped.
    pub boilerplate_markers: Vec<String>,

    /// Replacement for the built-in row pattern.
    ///
    /// Must define the named groups `test`, `value` and `unit`; `range` is
    /// optional. Checked by [`ExtractionConfigBuilder::build`].
    pub row_pattern: Option<String>,

    /// Accept rows that end after the unit, with no reference range.
    /// Off by default: with it on, lines such as `Age : 42 Years` parse as
    /// rows. Ignored when `row_pattern` is set.
    #[serde(default)]
    pub optional_range: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            password: None,
            download_timeout_secs: 120,
            boilerplate_prefixes: DEFAULT_BOILERPLATE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            boilerplate_markers: DEFAULT_BOILERPLATE_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            row_pattern: None,
            optional_range: false,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Add one boilerplate prefix on top of the defaults.
    pub fn boilerplate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.boilerplate_prefixes.push(prefix.into());
        self
    }

    /// Add one boilerplate marker on top of the defaults.
    pub fn boilerplate_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.boilerplate_markers.push(marker.into());
        self
    }

    /// Replace the whole prefix list (an empty list disables the rule).
    pub fn boilerplate_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.boilerplate_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the whole marker list (an empty list disables the rule).
    pub fn boilerplate_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.boilerplate_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn row_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.row_pattern = Some(pattern.into());
        self
    }

    pub fn optional_range(mut self, enabled: bool) -> Self {
        self.config.optional_range = enabled;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, LabReportError> {
        let c = &self.config;
        if c.boilerplate_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(LabReportError::InvalidConfig(
                "Boilerplate prefixes must not be empty (an empty prefix drops every line)".into(),
            ));
        }
        if c.boilerplate_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(LabReportError::InvalidConfig(
                "Boilerplate markers must not be empty (an empty marker drops every line)".into(),
            ));
        }
        if let Some(ref pattern) = c.row_pattern {
            RowParser::with_pattern(pattern)?;
        }
        if c.download_timeout_secs == 0 {
            return Err(LabReportError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page selection ───────────────────────────────────────────────────────

/// Specifies which pages of the report to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if (1..=total_pages).contains(p) {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|p| (1..=total_pages).contains(*p))
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

impl FromStr for PageSelection {
    type Err = LabReportError;

    /// Parse `all`, `5`, `3-15` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let invalid = |msg: String| LabReportError::InvalidConfig(msg);
        let page = |p: &str| -> Result<usize, LabReportError> {
            let n: usize = p
                .trim()
                .parse()
                .map_err(|_| invalid(format!("Invalid page number: '{}'", p.trim())))?;
            if n < 1 {
                return Err(invalid(format!(
                    "Pages are 1-indexed, minimum is 1 (got {n})"
                )));
            }
            Ok(n)
        };

        if s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(invalid(format!(
                    "Invalid page range '{start}-{end}': start must be <= end"
                )));
            }
            return Ok(PageSelection::Range(start, end));
        }

        if s.contains(',') {
            let pages = s.split(',').map(page).collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Set(pages));
        }

        Ok(PageSelection::Single(page(&s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_report_template() {
        let c = ExtractionConfig::default();
        assert_eq!(c.pages, PageSelection::All);
        assert_eq!(c.boilerplate_prefixes, vec!["Name :", "Lab No."]);
        assert_eq!(c.boilerplate_markers, vec!["Modern Pathology Lab"]);
        assert!(c.row_pattern.is_none());
        assert!(!c.optional_range);
        assert_eq!(c.download_timeout_secs, 120);
    }

    #[test]
    fn builder_rejects_empty_prefix() {
        let err = ExtractionConfig::builder()
            .boilerplate_prefix("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, LabReportError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_pattern_without_groups() {
        let err = ExtractionConfig::builder()
            .row_pattern(r"^(.+)\s+(\d+)$")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("test"), "got: {err}");
    }

    #[test]
    fn builder_replaces_lists() {
        let c = ExtractionConfig::builder()
            .boilerplate_prefixes(["Patient ID"])
            .boilerplate_markers(Vec::<String>::new())
            .build()
            .unwrap();
        assert_eq!(c.boilerplate_prefixes, vec!["Patient ID"]);
        assert!(c.boilerplate_markers.is_empty());
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(PageSelection::Range(4, 9).to_indices(5), vec![3, 4]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3, 7]).to_indices(5),
            vec![0, 2]
        );
    }

    #[test]
    fn page_selection_parses() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!(" ALL ".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!("5".parse::<PageSelection>().unwrap(), PageSelection::Single(5));
        assert_eq!(
            "3-15".parse::<PageSelection>().unwrap(),
            PageSelection::Range(3, 15)
        );
        assert_eq!(
            "1, 3,5".parse::<PageSelection>().unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn page_selection_rejects_bad_input() {
        assert!("0".parse::<PageSelection>().is_err());
        assert!("5-2".parse::<PageSelection>().is_err());
        assert!("1,x".parse::<PageSelection>().is_err());
        assert!("first".parse::<PageSelection>().is_err());
    }
}
