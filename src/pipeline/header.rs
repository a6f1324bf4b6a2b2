//! Patient header fields from the first page.
//!
//! Each field is the first case-insensitive match anywhere in the page
//! text. The separator after the label is optional (`Name : X`, `Name- X`,
//! `Name X`) and may be followed by a line break.

use crate::output::PatientHeader;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Name\s*[:\-]?\s*(.+)").unwrap());

static RE_AGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Age\s*[:\-]?\s*(\d+)").unwrap());

static RE_GENDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Gender\s*[:\-]?\s*(Male|Female|Other)").unwrap());

/// Read name, age and gender from one page of text.
pub fn extract_header(text: &str) -> PatientHeader {
    PatientHeader {
        name: first_capture(&RE_NAME, text),
        age: first_capture(&RE_AGE, text),
        gender: first_capture(&RE_GENDER, text),
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
