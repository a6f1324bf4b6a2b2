//! Input resolution: turn a user-supplied path or URL into a local PDF file.
//!
//! pdfium opens reports from a file-system path, so URL inputs are downloaded
//! into a `TempDir` owned by [`ReportSource`]. The directory is removed when
//! the source is dropped. Both branches check the `%PDF` signature before
//! handing the path on.

use crate::error::LabReportError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A report that is ready to be opened by pdfium.
#[derive(Debug)]
pub enum ReportSource {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the report lives in `_temp_dir` until drop.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ReportSource {
    /// Path of the PDF regardless of where it came from.
    pub fn path(&self) -> &Path {
        match self {
            ReportSource::Local(p) => p,
            ReportSource::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve `input` (path or URL) to a local PDF.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ReportSource, LabReportError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LabReportError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download(input, timeout_secs).await
    } else {
        open_local(Path::new(input)).map(ReportSource::Local)
    }
}

/// Validate a local path: exists, readable, starts with `%PDF`.
pub fn open_local(path: &Path) -> Result<PathBuf, LabReportError> {
    let path = path.to_path_buf();
    if !path.exists() {
        return Err(LabReportError::FileNotFound { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(LabReportError::PermissionDenied { path });
        }
        Err(_) => return Err(LabReportError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() {
        check_magic(&path, &magic)?;
    }

    debug!("Resolved local report: {}", path.display());
    Ok(path)
}

/// Reject buffers that do not start with the PDF signature.
///
/// Buffers shorter than four bytes are left for pdfium to reject.
pub fn check_magic(path: &Path, bytes: &[u8]) -> Result<(), LabReportError> {
    if bytes.len() < PDF_MAGIC.len() || &bytes[..4] == PDF_MAGIC {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&bytes[..4]);
    Err(LabReportError::NotAPdf {
        path: path.to_path_buf(),
        magic,
    })
}

async fn download(url: &str, timeout_secs: u64) -> Result<ReportSource, LabReportError> {
    info!("Downloading report from: {}", url);

    let failed = |reason: String| LabReportError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            LabReportError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

    let temp_dir = TempDir::new().map_err(|e| LabReportError::Internal(e.to_string()))?;
    let path = temp_dir.path().join(filename_from_url(url));
    check_magic(&path, &bytes)?;

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| LabReportError::Internal(format!("Failed to write temp file: {e}")))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), path.display());
    Ok(ReportSource::Downloaded {
        path,
        _temp_dir: temp_dir,
    })
}

/// Last URL path segment when it looks like a file name, else `report.pdf`.
fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty() && last.contains('.'))
        .unwrap_or_else(|| "report.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://lab.example/report.pdf"));
        assert!(is_url("http://lab.example/report.pdf"));
        assert!(!is_url("/tmp/report.pdf"));
        assert!(!is_url("report.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://lab.example/r/Blood_Report.pdf"),
            "Blood_Report.pdf"
        );
        assert_eq!(filename_from_url("https://lab.example/r/12345"), "report.pdf");
        assert_eq!(filename_from_url("not a url"), "report.pdf");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = open_local(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, LabReportError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04zipdata").unwrap();
        let err = open_local(f.path()).unwrap_err();
        match err {
            LabReportError::NotAPdf { magic, .. } => assert_eq!(&magic, b"PK\x03\x04"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pdf_signature_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\n%%EOF").unwrap();
        assert_eq!(open_local(f.path()).unwrap(), f.path());
    }

    #[test]
    fn empty_input_is_invalid() {
        let err = tokio_test::block_on(resolve_input("   ", 5)).unwrap_err();
        assert!(matches!(err, LabReportError::InvalidInput { .. }));
    }
}
