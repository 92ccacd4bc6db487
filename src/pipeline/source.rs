//! Direct text-layer extraction: pull embedded text from a PDF via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread-pool thread designed for blocking operations, so Tokio worker
//! threads never stall while pdfium walks the page tree.
//!
//! A digitally-produced contract carries its full text here and the OCR
//! fallback never runs. A scanned contract yields an empty (or nearly
//! empty) string — the length heuristic in [`crate::extract`] decides.

use crate::error::ExtractError;
use crate::output::DocumentInfo;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Extract the concatenated text layer of every page.
///
/// Pages are joined with a single newline; downstream normalisation
/// collapses it anyway. Returns an empty string for image-only documents —
/// that is a valid result, not an error.
pub async fn extract_text_layer(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<String, ExtractError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || text_layer_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| ExtractError::Internal(format!("Text-layer task panicked: {e}")))?
}

fn text_layer_blocking(pdf_path: &Path, password: Option<&str>) -> Result<String, ExtractError> {
    let pdfium = Pdfium::default();
    let document = load_document(&pdfium, pdf_path, password)?;

    let mut chunks = Vec::new();
    for page in document.pages().iter() {
        let text = page
            .text()
            .map_err(|e| ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?
            .all();
        chunks.push(text);
    }

    let text = chunks.join("\n");
    debug!(
        "Text layer: {} pages, {} chars",
        document.pages().len(),
        text.len()
    );
    Ok(text)
}

/// Open a document, mapping pdfium's password failures onto the dedicated
/// error variants.
pub(crate) fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ExtractError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{e:?}");
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                ExtractError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                ExtractError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Extract document metadata without reading page content.
pub async fn document_info(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentInfo, ExtractError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || document_info_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| ExtractError::Internal(format!("Metadata task panicked: {e}")))?
}

fn document_info_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentInfo, ExtractError> {
    let pdfium = Pdfium::default();
    let document = load_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();
    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentInfo {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}
