//! Pipeline stages for lease-contract extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the OCR engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ source ──┬──▶ normalize ──▶ segment ──▶ record
//! (path)  (text layer)│   (collapse ws)  (markers)   (dotted paths)
//!                     │
//!                     └──▶ ocr ─────────▲
//!                         (fallback when the text layer is empty/short)
//! ```
//!
//! 1. [`input`]     — validate the user-supplied path; owns uploaded temp files
//! 2. [`source`]    — pull the digital text layer via pdfium; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`ocr`]       — rasterise pages and recognise them with Tesseract when
//!    the text layer is missing (scanned documents)
//! 4. [`normalize`] — collapse whitespace/linebreak noise into single spaces
//! 5. [`segment`]   — the core: carve the blob into marker-bounded value
//!    spans using [`pattern`]-built tolerant matchers

pub mod input;
pub mod normalize;
pub mod ocr;
pub mod pattern;
pub mod segment;
pub mod source;
