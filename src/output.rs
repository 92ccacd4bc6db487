//! Output types: the extraction result, its statistics, and document
//! metadata.

use crate::record::ExtractionRecord;
use serde::Serialize;

/// Which collaborator produced the text the record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// The document's embedded text layer.
    TextLayer,
    /// The render-and-recognise fallback for scanned documents.
    Ocr,
}

/// The complete result of one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutput {
    /// The structured record. Every schema leaf is present, holding either
    /// an extracted value or the `"no info"` sentinel.
    pub record: ExtractionRecord,
    /// The normalised text the record was segmented from. Useful for
    /// auditing why a field came back as the sentinel.
    pub text: String,
    /// Which source produced `text`.
    pub source: TextSource,
    /// Timing and match statistics.
    pub stats: ExtractionStats,
}

/// Statistics about an extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionStats {
    /// Length of the normalised text, in characters.
    pub text_chars: usize,
    /// Schema entries whose marker was found with a non-empty value.
    pub matched_fields: usize,
    /// Total schema entries.
    pub total_fields: usize,
    /// Wall-clock time spent acquiring text (text layer, plus OCR when the
    /// fallback ran).
    pub source_duration_ms: u64,
    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}

/// Document metadata, available without running extraction.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_source_serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&TextSource::TextLayer).unwrap(),
            "\"text_layer\""
        );
        assert_eq!(serde_json::to_string(&TextSource::Ocr).unwrap(), "\"ocr\"");
    }
}
