//! pdfium binding.
//!
//! Lookup order, first hit wins:
//!
//! 1. `PDFIUM_LIB_PATH`: an explicit library file or a directory holding one
//! 2. the directory of the running executable
//! 3. the current working directory
//! 4. the system library search path
//!
//! A fresh [`Pdfium`] is bound per extraction. Binding is cheap next to
//! loading a document and keeps the blocking tasks free of shared state.

use crate::error::LabReportError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to the first pdfium library found (see module docs).
pub fn bind_pdfium() -> Result<Pdfium, LabReportError> {
    let mut attempts: Vec<String> = Vec::new();

    for candidate in candidate_paths() {
        if !candidate.exists() {
            continue;
        }
        match Pdfium::bind_to_library(&candidate) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {e}", candidate.display())),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound pdfium from the system library path");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {e}"));
            Err(LabReportError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

/// Library files to try before the system search path, in order.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(raw) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !raw.trim().is_empty() {
            paths.push(library_in(Path::new(raw.trim())));
        }
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(library_in(&dir));
    }
    paths.push(library_in(Path::new(".")));

    paths
}

/// `path` itself when it names a file, else the platform library name inside it.
fn library_in(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resolves_to_platform_library() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library_in(dir.path());
        assert!(lib.starts_with(dir.path()));
        assert!(lib.to_string_lossy().contains("pdfium"));
    }

    #[test]
    fn file_path_is_used_verbatim() {
        let p = Path::new("/opt/pdfium/lib/libpdfium.so");
        assert_eq!(library_in(p), p.to_path_buf());
    }

    #[test]
    fn working_directory_is_always_a_candidate() {
        let candidates = candidate_paths();
        assert!(candidates
            .iter()
            .any(|p| p.starts_with(".") && p.to_string_lossy().contains("pdfium")));
    }
}
