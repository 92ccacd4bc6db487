//! The field segmentation engine: carve normalised text into marker-bounded
//! value spans.
//!
//! ## The algorithm
//!
//! For schema entry `i`, the value is **everything between its marker and
//! the earliest occurrence of any marker declared after it** — not whichever
//! marker happens to come next in the raw text. Each entry is matched
//! independently from the start of the text, so the first textual occurrence
//! of a marker always wins, and a missing marker degrades that one field to
//! the [`NO_INFO`] sentinel without affecting the rest.
//!
//! Bounding by *later-declared* markers is what keeps a field from
//! swallowing subsequent label text when a marker in between is missing or
//! garbled: the span ends at the nearest surviving boundary, at the cost of
//! truncated or empty values when markers collide. If a document's layout
//! diverges from the schema order, the affected spans will be wrong — a
//! documented property of the approach, not something this engine detects.
//!
//! ## Why no lookahead?
//!
//! The classic formulation is a lazy capture with a lookahead alternation of
//! the remaining markers. The `regex` crate deliberately has no lookahead,
//! and none is needed: "lazy up to the first position where a boundary
//! matches" is exactly "ends at the earliest boundary match at or after the
//! value start", which [`Regex::find_at`] expresses directly.
//!
//! The engine is total: any text in, a value or sentinel out for every
//! schema key. Errors can only come from compiling the schema.

use crate::error::ExtractError;
use crate::pipeline::pattern;
use crate::record::NO_INFO;
use crate::schema::{DottedPath, MarkerSchema};
use regex::Regex;
use tracing::trace;

/// A [`MarkerSchema`] with its matchers compiled, ready to run over any
/// number of documents. Compile once, share read-only.
#[derive(Debug)]
pub struct CompiledSchema {
    entries: Vec<CompiledEntry>,
}

#[derive(Debug)]
struct CompiledEntry {
    path: DottedPath,
    /// Matches the flexible label plus its optional trailing separator;
    /// the value span starts at this match's end.
    matcher: Regex,
    /// Matches the bare flexible label; used as an end boundary for every
    /// entry declared before this one.
    boundary: Regex,
}

impl CompiledSchema {
    /// Compile every entry's matcher and boundary pattern.
    pub fn compile(schema: &MarkerSchema) -> Result<Self, ExtractError> {
        let entries = schema
            .iter()
            .map(|entry| {
                let matcher = pattern::compile(&pattern::marker_pattern(&entry.label))
                    .map_err(|e| ExtractError::Internal(format!(
                        "marker pattern for '{}' failed to compile: {e}",
                        entry.path
                    )))?;
                let boundary = pattern::compile(&pattern::flexible_pattern(&entry.label))
                    .map_err(|e| ExtractError::Internal(format!(
                        "boundary pattern for '{}' failed to compile: {e}",
                        entry.path
                    )))?;
                Ok(CompiledEntry {
                    path: entry.path.clone(),
                    matcher,
                    boundary,
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;
        Ok(Self { entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Segment `text` (already normalised) into one value per schema entry, in
/// schema order.
///
/// Returns `(path, value)` for **every** entry — a marker absent from the
/// text, or present with an empty span, yields the [`NO_INFO`] sentinel.
pub fn segment(text: &str, schema: &CompiledSchema) -> Vec<(DottedPath, String)> {
    schema
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let value = match entry.matcher.find(text) {
                Some(m) => {
                    let start = m.end();
                    let end = nearest_boundary(text, start, &schema.entries[i + 1..]);
                    let span = text[start..end].trim();
                    trace!(path = %entry.path, start, end, "marker matched");
                    if span.is_empty() {
                        NO_INFO.to_string()
                    } else {
                        span.to_string()
                    }
                }
                None => NO_INFO.to_string(),
            };
            (entry.path.clone(), value)
        })
        .collect()
}

/// The earliest start of any later-declared marker at or after `from`,
/// or end-of-text when none of them occurs again.
fn nearest_boundary(text: &str, from: usize, rest: &[CompiledEntry]) -> usize {
    rest.iter()
        .filter_map(|entry| entry.boundary.find_at(text, from).map(|m| m.start()))
        .min()
        .unwrap_or(text.len())
}
