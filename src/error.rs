//! Error types for the leaselens library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Runtime**: a document could not be processed
//!   (bad input file, corrupt PDF, OCR engine failure). Returned as
//!   `Err(ExtractError)` from the top-level `extract*` functions. Field
//!   lookup failures are *not* errors — a marker that never occurs in the
//!   text degrades to the `"no info"` sentinel instead.
//!
//! * [`SchemaError`] — **Construction-time**: the marker catalog itself is
//!   malformed (duplicate keys, a path that is both leaf and branch).
//!   Surfaced once, when the schema is built, never per document.
//!
//! The separation keeps the per-document path total: once a schema has been
//! validated, extraction over arbitrary text cannot fail structurally.

use std::path::PathBuf;
use thiserror::Error;

/// All runtime errors returned by the leaselens library.
///
/// Schema malformation uses [`SchemaError`] and is reported at
/// construction time rather than per document.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error while rasterising a page for OCR.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// Tesseract could not be initialised for the configured language.
    #[error(
        "OCR engine failed to initialise for language '{language}': {detail}\n\
         Make sure the Tesseract language data is installed \
         (e.g. apt install tesseract-ocr-kor)."
    )]
    OcrInit { language: String, detail: String },

    /// Tesseract failed while recognising a rendered page.
    #[error("OCR recognition failed on page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Schema errors ─────────────────────────────────────────────────────
    /// The marker catalog is malformed. Always a programming/config error,
    /// raised when the schema is constructed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy, or install\n\
pdfium for your platform (https://github.com/bblanchon/pdfium-binaries).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A construction-time error in a [`crate::schema::MarkerSchema`].
///
/// Raised once when the catalog is built. A validated schema guarantees
/// that per-document assignment can never hit a structural conflict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two entries share the same dotted key path.
    #[error("Duplicate schema key: '{key}'")]
    DuplicateKey { key: String },

    /// A dotted path was empty or contained an empty segment.
    #[error("Invalid dotted path: '{key}' (empty path or empty segment)")]
    EmptyPath { key: String },

    /// An entry has an empty marker label.
    #[error("Schema entry '{key}' has an empty marker label")]
    EmptyLabel { key: String },

    /// One key path is a strict prefix of another, so the same node would
    /// need to be both a leaf and a branch.
    #[error("Schema key '{shorter}' is a prefix of '{longer}': a node cannot be both value and branch")]
    PathConflict { shorter: String, longer: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = ExtractError::NotAPdf {
            path: PathBuf::from("/tmp/contract.pdf"),
            magic: *b"PK\x03\x04",
        };
        let msg = e.to_string();
        assert!(msg.contains("not a valid PDF"), "got: {msg}");
        assert!(msg.contains("contract.pdf"));
    }

    #[test]
    fn ocr_init_display_names_language() {
        let e = ExtractError::OcrInit {
            language: "kor".into(),
            detail: "no tessdata".into(),
        };
        assert!(e.to_string().contains("kor"));
        assert!(e.to_string().contains("tesseract-ocr-kor"));
    }

    #[test]
    fn schema_error_converts_to_extract_error() {
        let s = SchemaError::DuplicateKey {
            key: "landlord.name".into(),
        };
        let e: ExtractError = s.into();
        assert!(e.to_string().contains("landlord.name"));
    }

    #[test]
    fn path_conflict_display_names_both_keys() {
        let e = SchemaError::PathConflict {
            shorter: "landlord".into(),
            longer: "landlord.name".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'landlord'"));
        assert!(msg.contains("'landlord.name'"));
    }
}
