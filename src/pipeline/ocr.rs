//! OCR fallback: rasterise pages via pdfium and recognise them with
//! Tesseract.
//!
//! ## Why render-then-recognise?
//!
//! A scanned contract has no text layer to read — each page is one big
//! image. pdfium rasterises the page, the bitmap is PNG-encoded in memory
//! (Tesseract's Leptonica front-end decodes encoded image data, so no temp
//! files are needed), and Tesseract reads it as a single uniform block.
//! PSM "single block" fits the lease form: one dense region of label/value
//! text, no columns.
//!
//! ## Why cap pixels, not DPI?
//!
//! Scan sizes vary wildly; capping the longest rendered edge keeps memory
//! bounded regardless of the physical page size, and ~2000 px is plenty for
//! Tesseract to resolve form print.
//!
//! The whole fallback is blocking C-library work (pdfium and Tesseract
//! both), so it runs on one `spawn_blocking` thread, page by page.

use crate::error::ExtractError;
use crate::pipeline::source::load_document;
use image::DynamicImage;
use leptess::{LepTess, Variable};
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Tesseract page-segmentation mode 6: assume a single uniform block of
/// text. Matches the lease form's layout.
const PSM_SINGLE_BLOCK: &str = "6";

/// Recognise the document's pages and return the concatenated text.
///
/// `page_limit` of 0 means all pages. Page texts are joined with a
/// newline; normalisation downstream collapses it.
pub async fn extract_text_via_ocr(
    pdf_path: &Path,
    language: &str,
    max_pixels: u32,
    page_limit: usize,
    password: Option<&str>,
) -> Result<String, ExtractError> {
    let path = pdf_path.to_path_buf();
    let lang = language.to_string();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        ocr_blocking(&path, &lang, max_pixels, page_limit, pwd.as_deref())
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("OCR task panicked: {e}")))?
}

fn ocr_blocking(
    pdf_path: &Path,
    language: &str,
    max_pixels: u32,
    page_limit: usize,
    password: Option<&str>,
) -> Result<String, ExtractError> {
    let pdfium = Pdfium::default();
    let document = load_document(&pdfium, pdf_path, password)?;
    let pages = document.pages();

    let total_pages = pages.len() as usize;
    let page_count = if page_limit == 0 {
        total_pages
    } else {
        page_limit.min(total_pages)
    };
    info!("OCR fallback: {page_count}/{total_pages} pages, language '{language}'");

    let mut engine = LepTess::new(None, language).map_err(|e| ExtractError::OcrInit {
        language: language.to_string(),
        detail: e.to_string(),
    })?;
    engine
        .set_variable(Variable::TesseditPagesegMode, PSM_SINGLE_BLOCK)
        .map_err(|e| ExtractError::OcrInit {
            language: language.to_string(),
            detail: format!("failed to set page segmentation mode: {e}"),
        })?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut chunks = Vec::with_capacity(page_count);
    for idx in 0..page_count {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ExtractError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ExtractError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let image = bitmap.as_image();
        let text = recognise_page(&mut engine, &image, idx + 1)?;
        debug!("OCR page {}: {} chars", idx + 1, text.len());
        chunks.push(text);
    }

    Ok(chunks.join("\n"))
}

/// Run one rendered page through Tesseract.
fn recognise_page(
    engine: &mut LepTess,
    image: &DynamicImage,
    page_num: usize,
) -> Result<String, ExtractError> {
    // Leptonica decodes encoded image data, so the bitmap is PNG-encoded
    // in memory rather than round-tripped through a temp file.
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ExtractError::OcrFailed {
            page: page_num,
            detail: format!("PNG encoding failed: {e}"),
        })?;

    engine
        .set_image_from_mem(&png)
        .map_err(|e| ExtractError::OcrFailed {
            page: page_num,
            detail: format!("failed to load page image: {e}"),
        })?;

    engine.get_utf8_text().map_err(|e| ExtractError::OcrFailed {
        page: page_num,
        detail: e.to_string(),
    })
}
