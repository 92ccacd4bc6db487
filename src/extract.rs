//! Extraction entry points: orchestrate source selection, normalisation,
//! segmentation, and record assembly.
//!
//! ## Source selection
//!
//! The pipeline reads the digital text layer first. If the result is empty
//! or implausibly short — the signature of a scanned, image-only document —
//! it is discarded and the OCR fallback produces the text instead. One
//! irrevocable decision per document; the two sources are never blended and
//! there is no retry.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{DocumentInfo, ExtractionOutput, ExtractionStats, TextSource};
use crate::pipeline::segment::CompiledSchema;
use crate::pipeline::{input, normalize, ocr, segment, source};
use crate::record::ExtractionRecord;
use crate::schema::MarkerSchema;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract a structured record from a lease-contract PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_path` — Path to a PDF file
/// * `config` — Extraction configuration
///
/// # Returns
/// `Ok(ExtractionOutput)` whenever text could be acquired — even when no
/// marker matched (the record then holds sentinels throughout).
///
/// # Errors
/// Returns `Err(ExtractError)` only for upstream failures: unreadable or
/// non-PDF input, corrupt/encrypted documents, OCR engine failures.
pub async fn extract(
    input_path: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting extraction: {input_path}");

    // ── Step 1: Validate input ───────────────────────────────────────────
    let pdf_path = input::validate_input(input_path)?;

    // ── Step 2: Acquire text (text layer, OCR fallback) ──────────────────
    let source_start = Instant::now();
    let direct = source::extract_text_layer(&pdf_path, config.password.as_deref()).await?;

    let (raw_text, text_source) = if needs_ocr(&direct, config.min_text_len) {
        debug!(
            "Text layer too short ({} chars < {}); document appears image-based, applying OCR",
            direct.trim().chars().count(),
            config.min_text_len
        );
        let recognised = ocr::extract_text_via_ocr(
            &pdf_path,
            &config.ocr_language,
            config.max_rendered_pixels,
            config.ocr_page_limit,
            config.password.as_deref(),
        )
        .await?;
        (recognised, TextSource::Ocr)
    } else {
        (direct, TextSource::TextLayer)
    };
    let source_duration_ms = source_start.elapsed().as_millis() as u64;

    // ── Step 3–5: Normalise, segment, assemble ───────────────────────────
    let text = normalize::normalize(&raw_text);
    let record = extract_from_text(&text, &config.schema)?;

    let stats = ExtractionStats {
        text_chars: text.chars().count(),
        matched_fields: record.matched_count(),
        total_fields: config.schema.len(),
        source_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Extraction complete: {}/{} fields, source {:?}, {}ms",
        stats.matched_fields, stats.total_fields, text_source, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        record,
        text,
        source: text_source,
        stats,
    })
}

/// Extract a record from already-acquired text. No I/O.
///
/// Normalises the text, runs the segmentation engine, and folds every
/// `(path, value)` pair into a record pre-filled with sentinels — so the
/// result covers every schema path even on total match failure.
pub fn extract_from_text(
    text: &str,
    schema: &MarkerSchema,
) -> Result<ExtractionRecord, ExtractError> {
    let compiled = CompiledSchema::compile(schema)?;
    let normalized = normalize::normalize(text);

    let mut record = ExtractionRecord::prefilled(schema);
    for (path, value) in segment::segment(&normalized, &compiled) {
        record.assign(&path, value)?;
    }
    Ok(record)
}

/// Extract from an uploaded temp file, deleting it on every exit path.
///
/// The upload handler owns a file that must not outlive the request;
/// ownership passes here and the guard removes the file whether
/// extraction succeeds, fails, or panics. Removal is idempotent — a file
/// already gone is not an error.
pub async fn extract_temp(
    temp_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let guard = input::OwnedTempFile::new(temp_path.as_ref());
    let result = extract(guard.path().to_string_lossy().as_ref(), config).await;
    drop(guard);
    result
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_path: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(input_path, config))
}

/// Extract and write the record as JSON directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input_path: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract(input_path, config).await?;
    let path = output_path.as_ref();

    let json = serde_json::to_string_pretty(&output.record)
        .map_err(|e| ExtractError::Internal(format!("JSON serialisation failed: {e}")))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExtractError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Read document metadata without extracting content.
///
/// Does not touch the OCR engine.
pub async fn inspect(input_path: impl AsRef<str>) -> Result<DocumentInfo, ExtractError> {
    let pdf_path = input::validate_input(input_path.as_ref())?;
    source::document_info(&pdf_path, None).await
}

/// The fallback decision: is the direct text too short to be trusted?
///
/// A scanned document's text layer is empty or holds a few stray glyphs
/// (stamps, watermarks). Anything shorter than `min_len` characters after
/// trimming means the document is treated as image-only.
pub fn needs_ocr(direct_text: &str, min_len: usize) -> bool {
    direct_text.trim().chars().count() < min_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NO_INFO;
    use crate::schema::DottedPath;

    fn path(key: &str) -> DottedPath {
        DottedPath::parse(key).unwrap()
    }

    #[test]
    fn needs_ocr_threshold() {
        assert!(needs_ocr("", 10));
        assert!(needs_ocr("   \n  ", 10));
        assert!(needs_ocr("짧은글", 10));
        assert!(!needs_ocr("이 문서는 충분히 긴 텍스트 레이어를 가지고 있다", 10));
    }

    #[test]
    fn extract_from_text_full_pipeline() {
        let schema = MarkerSchema::korean_lease();
        // Raw, un-normalised input: linebreaks and OCR spacing noise
        let text = "임대인.주소   서울시 강남구\n임대인.주민등록번호 800101-1234567\n\
                    임대인.전화 02-555-1234\n임대인.성 명 김임대\n\
                    임차인.주소 서울시 마포구\n임차인.성명 박차임";
        let record = extract_from_text(text, &schema).unwrap();

        assert_eq!(record.get(&path("landlord.address")), Some("서울시 강남구"));
        assert_eq!(record.get(&path("landlord.name")), Some("김임대"));
        assert_eq!(record.get(&path("tenant.name")), Some("박차임"));
        // Markers absent from the text stay at the sentinel
        assert_eq!(record.get(&path("tenant.phone")), Some(NO_INFO));
        assert_eq!(record.get(&path("contractPeriod")), Some(NO_INFO));
        // Every schema path exists
        assert_eq!(record.leaf_count(), schema.len());
    }

    #[test]
    fn extract_from_text_empty_input_yields_all_sentinels() {
        let schema = MarkerSchema::korean_lease();
        let record = extract_from_text("", &schema).unwrap();
        assert_eq!(record.matched_count(), 0);
        assert_eq!(record.leaf_count(), schema.len());
    }
}
