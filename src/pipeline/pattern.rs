//! Flexible marker patterns: match a label despite OCR character spacing.
//!
//! ## Why per-character tolerance?
//!
//! OCR and PDF text layers intermittently inject spacing inside otherwise
//! contiguous label text — a form printed as `성명` frequently comes back as
//! `성 명` or `성  명`, and which variant appears differs per scan. Rather
//! than enumerate known spacings, every label character is regex-escaped and
//! the characters are joined with `\s*`, so any amount of interior
//! whitespace matches. The field content around the label is untouched.

use regex::Regex;

/// Build a regex source matching `label`'s characters in order with
/// arbitrary whitespace permitted between each adjacent pair.
///
/// Every character is escaped first, so labels containing regex
/// metacharacters (the catalog uses `.` as a block separator, e.g.
/// `임대인.주소`) match literally.
pub fn flexible_pattern(label: &str) -> String {
    label
        .chars()
        .map(|ch| regex::escape(&ch.to_string()))
        .collect::<Vec<_>>()
        .join(r"\s*")
}

/// Build the full marker-matcher source: the flexible label followed by an
/// optional separator (`:` or fullwidth `：`) with surrounding optional
/// whitespace. The value span starts where this match ends.
pub fn marker_pattern(label: &str) -> String {
    format!(r"{}\s*[:：]?\s*", flexible_pattern(label))
}

/// Compile a pattern source case-insensitively.
///
/// Case-insensitivity is irrelevant for Hangul but keeps Latin labels
/// (unit numbers, English riders) tolerant of OCR case flips.
pub fn compile(source: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){source}"))
}
