//! Positional text-item scanning: the coordinate-based inspection strategy.
//!
//! The marker engine works on a flattened text blob and ignores layout
//! entirely. When a new contract template defeats it, the first question is
//! always "where does the text actually sit on the page?" — this module
//! answers it by enumerating every text fragment of the text layer with its
//! page coordinates. The CLI exposes it as `--coords`.
//!
//! This is a secondary, layout-specific strategy: nothing here feeds the
//! marker pipeline, and items are discarded after inspection.

use crate::error::ExtractError;
use crate::pipeline::source::load_document;
use pdfium_render::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// One text fragment of the text layer with its position.
///
/// Coordinates are PDF points with the origin at the page's bottom-left,
/// as pdfium reports them. `page` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub page: usize,
}

/// Enumerate every text segment of every page with its coordinates.
pub async fn text_items(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<RawTextItem>, ExtractError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || text_items_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| ExtractError::Internal(format!("Coordinate scan panicked: {e}")))?
}

fn text_items_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<RawTextItem>, ExtractError> {
    let pdfium = Pdfium::default();
    let document = load_document(&pdfium, pdf_path, password)?;

    let mut items = Vec::new();
    for (page_idx, page) in document.pages().iter().enumerate() {
        let text = page.text().map_err(|e| ExtractError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

        for segment in text.segments().iter() {
            let fragment = segment.text();
            if fragment.trim().is_empty() {
                continue;
            }
            let bounds = segment.bounds();
            items.push(RawTextItem {
                text: fragment,
                x: bounds.left.value,
                y: bounds.bottom.value,
                page: page_idx + 1,
            });
        }
    }

    debug!("Coordinate scan: {} text items", items.len());
    Ok(items)
}
