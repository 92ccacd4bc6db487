//! Text normalisation: collapse whitespace noise from rendering and OCR.
//!
//! ## Why collapse instead of strip?
//!
//! Upstream sources are messy in different ways: the pdfium text layer emits
//! hard line breaks wherever the layout wrapped, and Tesseract sprinkles
//! newlines and double spaces around recognised blocks. The marker engine
//! only cares about character order, so every maximal whitespace run is
//! reduced to a single space and the ends are trimmed. Word boundaries
//! survive; layout does not.
//!
//! The function is pure and idempotent — normalising already-normalised
//! text is a no-op, so stages can be re-run safely.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every maximal whitespace run (spaces, tabs, newlines) to a
/// single space and trim both ends.
pub fn normalize(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}
