//! Configuration types for lease-contract extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ExtractError;
use crate::schema::MarkerSchema;

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use leaselens::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .min_text_len(20)
///     .ocr_language("kor+eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Minimum direct-text length before the OCR fallback triggers. Default: 10.
    ///
    /// A digital contract yields hundreds of characters from its text layer;
    /// a scanned one yields nothing, or a few stray glyphs from a stamp or
    /// watermark. Anything under this many characters is treated as
    /// image-only and re-read via OCR. The decision is made once per
    /// document — the two sources are never blended.
    pub min_text_len: usize,

    /// Tesseract language code(s) for the OCR fallback. Default: `"kor"`.
    ///
    /// The standard lease form is Korean; pass `"kor+eng"` for contracts
    /// with mixed-language riders. The language data must be installed on
    /// the host.
    pub ocr_language: String,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// A safety cap on rasterisation: an A0 scan rendered unbounded could
    /// exhaust memory before Tesseract ever sees it. Either dimension is
    /// capped, the other scales proportionally.
    pub max_rendered_pixels: u32,

    /// Maximum number of pages fed to the OCR fallback. 0 = all pages. Default: 0.
    ///
    /// The standard form carries every marker on the first page or two;
    /// capping pages bounds worst-case OCR time on long scanned annexes.
    pub ocr_page_limit: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// The marker catalog driving segmentation. Default:
    /// [`MarkerSchema::korean_lease()`].
    pub schema: MarkerSchema,

    /// Number of documents processed concurrently in batch mode. Default: 4.
    ///
    /// Each document runs an independent pipeline; pdfium and Tesseract work
    /// is blocking and CPU-bound, so there is little to gain beyond the
    /// physical core count.
    pub concurrency: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_len: 10,
            ocr_language: "kor".to_string(),
            max_rendered_pixels: 2000,
            ocr_page_limit: 0,
            password: None,
            schema: MarkerSchema::korean_lease(),
            concurrency: 4,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn min_text_len(mut self, len: usize) -> Self {
        self.config.min_text_len = len;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn ocr_page_limit(mut self, pages: usize) -> Self {
        self.config.ocr_page_limit = pages;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn schema(mut self, schema: MarkerSchema) -> Self {
        self.config.schema = schema;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.ocr_language.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.schema.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "Marker schema must contain at least one entry".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source_system() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_text_len, 10);
        assert_eq!(config.ocr_language, "kor");
        assert_eq!(config.schema.len(), 16);
    }

    #[test]
    fn builder_clamps_floor_values() {
        let config = ExtractionConfig::builder()
            .max_rendered_pixels(1)
            .concurrency(0)
            .build()
            .unwrap();
        assert_eq!(config.max_rendered_pixels, 100);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn empty_language_rejected() {
        let result = ExtractionConfig::builder().ocr_language("  ").build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }
}
