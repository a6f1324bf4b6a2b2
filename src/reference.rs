//! Reference-range interpretation.
//!
//! Reports print ranges as free text (`13.0 - 17.0`, `< 200 mg/dL`,
//! `>= 40`). [`ReferenceRange::parse`] recognises those three shapes and
//! ignores any trailing unit; anything else is left uninterpreted and the
//! row is flagged [`RangeFlag::Unknown`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static RE_INTERVAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s*-\s*(\d+(?:\.\d*)?|\.\d+)").unwrap()
});

static RE_BOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(<=|=<|>=|=>|<|>)\s*(\d+(?:\.\d*)?|\.\d+)").unwrap());

/// A parsed reference range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReferenceRange {
    /// `low - high`, both ends inclusive.
    Between { low: f64, high: f64 },
    /// `< max` or `<= max`.
    AtMost { max: f64, inclusive: bool },
    /// `> min` or `>= min`.
    AtLeast { min: f64, inclusive: bool },
}

/// Position of a value relative to its reference range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeFlag {
    Low,
    Normal,
    High,
    /// Value or range could not be interpreted.
    #[default]
    Unknown,
}

impl RangeFlag {
    /// Word form used in CSV exports; empty when unknown.
    pub fn label(&self) -> &'static str {
        match self {
            RangeFlag::Low => "Low",
            RangeFlag::Normal => "Normal",
            RangeFlag::High => "High",
            RangeFlag::Unknown => "",
        }
    }
}

impl fmt::Display for RangeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RangeFlag::Low => "L",
            RangeFlag::Normal => "",
            RangeFlag::High => "H",
            RangeFlag::Unknown => "?",
        };
        f.write_str(s)
    }
}

impl ReferenceRange {
    /// Parse the printed range; `None` for empty or unrecognised text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(caps) = RE_INTERVAL.captures(text) {
            let a: f64 = caps[1].parse().ok()?;
            let b: f64 = caps[2].parse().ok()?;
            return Some(ReferenceRange::Between {
                low: a.min(b),
                high: a.max(b),
            });
        }

        let caps = RE_BOUND.captures(text)?;
        let bound: f64 = caps[2].parse().ok()?;
        let range = match &caps[1] {
            "<" => ReferenceRange::AtMost {
                max: bound,
                inclusive: false,
            },
            "<=" | "=<" => ReferenceRange::AtMost {
                max: bound,
                inclusive: true,
            },
            ">" => ReferenceRange::AtLeast {
                min: bound,
                inclusive: false,
            },
            _ => ReferenceRange::AtLeast {
                min: bound,
                inclusive: true,
            },
        };
        Some(range)
    }

    /// Classify `value` against this range.
    pub fn classify(&self, value: f64) -> RangeFlag {
        match *self {
            ReferenceRange::Between { low, high } => {
                if value < low {
                    RangeFlag::Low
                } else if value > high {
                    RangeFlag::High
                } else {
                    RangeFlag::Normal
                }
            }
            ReferenceRange::AtMost { max, inclusive } => {
                if value < max || (inclusive && value == max) {
                    RangeFlag::Normal
                } else {
                    RangeFlag::High
                }
            }
            ReferenceRange::AtLeast { min, inclusive } => {
                if value > min || (inclusive && value == min) {
                    RangeFlag::Normal
                } else {
                    RangeFlag::Low
                }
            }
        }
    }
}
