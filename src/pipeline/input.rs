//! Input validation and uploaded-file lifetime management.
//!
//! ## Why validate magic bytes up front?
//!
//! pdfium's error for a non-PDF file is an opaque load failure. Checking
//! the `%PDF` magic before handing the path over gives callers a precise
//! error (with the offending bytes) instead of a generic "corrupt" one.
//!
//! ## Why an owned temp guard?
//!
//! Uploaded contracts arrive as temp files that must not outlive the
//! request that carried them, whatever happens — success, extraction
//! error, or panic. [`OwnedTempFile`] ties deletion to `Drop`, the same
//! discipline the standard library applies to locks.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_input(path_str: &str) -> Result<PathBuf, ExtractError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound { path });
        }
    }

    debug!("Validated input PDF: {}", path.display());
    Ok(path)
}

/// Delete a file, tolerating its absence.
///
/// Uploaded temp files may already have been cleaned up by the storage
/// layer; a second delete must not fail the request.
pub fn delete_temp_file(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Ownership of an uploaded temp file: the file is deleted when the guard
/// drops, on every exit path.
#[derive(Debug)]
pub struct OwnedTempFile {
    path: PathBuf,
}

impl OwnedTempFile {
    /// Take ownership of the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OwnedTempFile {
    fn drop(&mut self) {
        if let Err(e) = delete_temp_file(&self.path) {
            tracing::warn!("Failed to delete temp file {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn nonexistent_file_is_not_found() {
        let result = validate_input("/definitely/not/a/real/file.pdf");
        assert!(matches!(result, Err(ExtractError::FileNotFound { .. })));
    }

    #[test]
    fn non_pdf_magic_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04not a pdf").unwrap();
        let result = validate_input(f.path().to_str().unwrap());
        assert!(matches!(result, Err(ExtractError::NotAPdf { .. })));
    }

    #[test]
    fn pdf_magic_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n%fake body").unwrap();
        let path = validate_input(f.path().to_str().unwrap()).unwrap();
        assert_eq!(path, f.path());
    }

    #[test]
    fn delete_is_idempotent() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let path = f.path().to_path_buf();
        drop(f); // file gone
        assert!(delete_temp_file(&path).is_ok());
        assert!(delete_temp_file(&path).is_ok());
    }

    #[test]
    fn owned_temp_file_deletes_on_drop() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let (_, path) = f.keep().unwrap();
        assert!(path.exists());
        drop(OwnedTempFile::new(&path));
        assert!(!path.exists());
    }
}
