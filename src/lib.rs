//! # leaselens
//!
//! Extract structured party and contract-term data from scanned Korean
//! lease contracts.
//!
//! ## Why this crate?
//!
//! Lease contracts arrive as PDFs with no reliable layout: digital exports,
//! photocopies, phone scans. Template-based extraction (fixed offsets,
//! per-form rectangles) breaks on every new scanner. Instead this crate
//! relies on what *does* survive scanning — the relative order of the
//! form's printed labels — and carves the flattened text into value spans
//! between consecutive labels, tolerating the whitespace noise OCR injects
//! inside them.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate path and %PDF magic
//!  ├─ 2. Source     read the text layer via pdfium
//!  ├─ 3. Fallback   short/empty text layer → rasterise + Tesseract (kor)
//!  ├─ 4. Normalize  collapse whitespace/linebreak runs to single spaces
//!  ├─ 5. Segment    marker-bounded value spans, schema order
//!  └─ 6. Record     nested record via dotted paths, "no info" sentinels
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leaselens::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("contract.pdf", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&output.record)?);
//!     eprintln!("matched {}/{} fields via {:?}",
//!         output.stats.matched_fields,
//!         output.stats.total_fields,
//!         output.source);
//!     Ok(())
//! }
//! ```
//!
//! Text that is already in hand (from a message queue, a different OCR
//! engine, a test) can skip the document stages entirely:
//!
//! ```rust
//! use leaselens::{extract_from_text, MarkerSchema};
//!
//! let record = extract_from_text(
//!     "임대인.전화 010-1234-5678 임대인.성명 홍길동",
//!     &MarkerSchema::korean_lease(),
//! ).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `leaselens` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! leaselens = { version = "0.4", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod positional;
pub mod record;
pub mod schema;
pub mod sectioned;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ExtractError, SchemaError};
pub use extract::{
    extract, extract_from_text, extract_sync, extract_temp, extract_to_file, inspect, needs_ocr,
};
pub use output::{DocumentInfo, ExtractionOutput, ExtractionStats, TextSource};
pub use positional::RawTextItem;
pub use record::{ExtractionRecord, NO_INFO};
pub use schema::{DottedPath, MarkerEntry, MarkerSchema};
