//! Writers for the text dump, the CSV table and the JSON output, plus the
//! terminal table renderer.
//!
//! File writes are atomic: content goes to `<path>.tmp` first and is renamed
//! into place, so an interrupted run never leaves a half-written export.

use crate::error::LabReportError;
use crate::output::{ExtractionOutput, LabResult};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file name for the text dump.
pub const DEFAULT_TEXT_DUMP: &str = "parsed_lab_report.txt";

/// Column titles of the results table.
pub const COLUMNS: [&str; 4] = ["Test Name", "Value", "Unit", "Reference Range"];

/// Write the marked document text.
pub async fn write_text_dump(path: &Path, marked_text: &str) -> Result<(), LabReportError> {
    write_atomic(path, marked_text.as_bytes()).await
}

/// Write the results as CSV with a trailing `Flag` column.
pub async fn write_csv(path: &Path, results: &[LabResult]) -> Result<(), LabReportError> {
    let bytes = results_to_csv(results).map_err(|source| LabReportError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &bytes).await
}

/// Write the whole extraction output as pretty JSON.
pub async fn write_json(path: &Path, output: &ExtractionOutput) -> Result<(), LabReportError> {
    let json = serde_json::to_vec_pretty(output)
        .map_err(|e| LabReportError::Internal(format!("Failed to serialise output: {e}")))?;
    write_atomic(path, &json).await
}

/// Encode results as CSV.
pub fn results_to_csv(results: &[LabResult]) -> Result<Vec<u8>, std::io::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| std::io::Error::other(e.to_string());

    writer
        .write_record(COLUMNS.iter().copied().chain(["Flag"]))
        .map_err(csv_err)?;
    for r in results {
        writer
            .write_record([
                r.test_name.as_str(),
                r.value.as_str(),
                r.unit.as_str(),
                r.reference_range.as_str(),
                r.flag().label(),
            ])
            .map_err(csv_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))
}

/// Render results as an aligned text table with a leading index column.
///
/// With `show_flags`, an `H`/`L` column marks values outside their range.
pub fn render_table(results: &[LabResult], show_flags: bool) -> String {
    if results.is_empty() {
        return "No lab results found.\n".to_string();
    }

    let rows: Vec<[&str; 4]> = results
        .iter()
        .map(|r| {
            [
                r.test_name.as_str(),
                r.value.as_str(),
                r.unit.as_str(),
                r.reference_range.as_str(),
            ]
        })
        .collect();

    let index_width = (results.len() - 1).to_string().len();
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (title, w) in COLUMNS.iter().zip(widths) {
        let _ = write!(out, "  {title:<w$}");
    }
    if show_flags {
        out.push_str("  Flag");
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for (i, (row, result)) in rows.iter().zip(results).enumerate() {
        let mut line = format!("{i:<index_width$}");
        for (cell, w) in row.iter().zip(widths) {
            let _ = write!(line, "  {cell:<w$}");
        }
        if show_flags {
            let _ = write!(line, "  {}", result.flag());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LabReportError> {
    let write_failed = |source: std::io::Error| LabReportError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(write_failed)?;
    }

    let tmp_path = tmp_path_for(path);
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(test: &str, value: &str, unit: &str, range: &str) -> LabResult {
        LabResult {
            test_name: test.into(),
            value: value.into(),
            unit: unit.into(),
            reference_range: range.into(),
        }
    }

    #[test]
    fn csv_has_header_and_flags() {
        let csv = results_to_csv(&[
            row("Hemoglobin", "11.0", "g/dL", "13.0 - 17.0"),
            row("Platelet Count, Auto", "2.5", "lakhs/cumm", ""),
        ])
        .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Test Name,Value,Unit,Reference Range,Flag");
        assert_eq!(lines[1], "Hemoglobin,11.0,g/dL,13.0 - 17.0,Low");
        assert_eq!(lines[2], "\"Platelet Count, Auto\",2.5,lakhs/cumm,,");
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(
            &[
                row("Hemoglobin", "13.5", "g/dL", "13.0 - 17.0"),
                row("Total Leucocyte Count", "8000", "cumm", "4000 - 11000"),
            ],
            false,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   Test Name"));
        assert!(lines[1].starts_with("0  Hemoglobin             13.5"));
        assert!(lines[2].starts_with("1  Total Leucocyte Count  8000"));
        // value column starts at the same offset on every line
        let col = lines[0].find("Value").unwrap();
        assert_eq!(&lines[1][col..col + 4], "13.5");
        assert_eq!(&lines[2][col..col + 4], "8000");
    }

    #[test]
    fn table_with_flags() {
        let table = render_table(&[row("Hemoglobin", "18.0", "g/dL", "13.0 - 17.0")], true);
        assert!(table.lines().next().unwrap().ends_with("Flag"));
        assert!(table.lines().nth(1).unwrap().ends_with('H'));
    }

    #[test]
    fn empty_table() {
        assert_eq!(render_table(&[], false), "No lab results found.\n");
    }

    #[test]
    fn tmp_path_keeps_directory() {
        assert_eq!(
            tmp_path_for(Path::new("out/report.csv")),
            PathBuf::from("out/report.csv.tmp")
        );
    }

    #[tokio::test]
    async fn text_dump_is_written_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_TEXT_DUMP);
        write_text_dump(&path, "\n--- Page 1 ---\nHemoglobin 13.5 g/dL")
            .await
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "\n--- Page 1 ---\nHemoglobin 13.5 g/dL");
        assert!(!tmp_path_for(&path).exists());
    }
}
