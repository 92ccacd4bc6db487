//! The marker catalog: which labels to look for, in which order, and where
//! each extracted value lands in the output record.
//!
//! ## Why order matters
//!
//! The segmentation engine (see [`crate::pipeline::segment`]) defines a
//! field's value as "everything between this marker and the next marker that
//! appears *later in the schema*", not the next marker in the raw text. The
//! declaration order below therefore **is** the expected document order. If a
//! contract's layout diverges from it, the affected spans will be wrong —
//! that is a documented property of the algorithm, not something the engine
//! second-guesses.
//!
//! A schema is constructed once, validated eagerly, and shared read-only
//! across any number of concurrent extractions.

use crate::error::SchemaError;
use serde::Serialize;
use std::fmt;

/// A dotted key path identifying a leaf in the output record,
/// e.g. `landlord.agent.name`.
///
/// Segments are stored split; the `.` separator exists only at the
/// serialisation boundary ([`fmt::Display`] / [`DottedPath::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DottedPath(Vec<String>);

impl DottedPath {
    /// Parse `"a.b.c"` into segments, rejecting empty paths and segments.
    pub fn parse(key: &str) -> Result<Self, SchemaError> {
        if key.is_empty() || key.split('.').any(|s| s.is_empty()) {
            return Err(SchemaError::EmptyPath {
                key: key.to_string(),
            });
        }
        Ok(Self(key.split('.').map(str::to_string).collect()))
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when `self` is a strict prefix of `other`.
    pub fn is_prefix_of(&self, other: &DottedPath) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// One catalog entry: a marker label expected in the source text and the
/// record path its trailing value is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerEntry {
    /// Where the value lands in the output record.
    pub path: DottedPath,
    /// The literal label expected immediately before the value.
    pub label: String,
}

impl MarkerEntry {
    /// Build an entry from a dotted key string and a label.
    pub fn new(key: &str, label: &str) -> Result<Self, SchemaError> {
        let path = DottedPath::parse(key)?;
        if label.trim().is_empty() {
            return Err(SchemaError::EmptyLabel {
                key: key.to_string(),
            });
        }
        Ok(Self {
            path,
            label: label.to_string(),
        })
    }
}

/// An ordered, validated catalog of [`MarkerEntry`] values.
///
/// Invariants enforced at construction:
/// * every path non-empty with non-empty segments;
/// * keys are unique;
/// * no key is a strict prefix of another (a node cannot be both a value
///   and a branch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerSchema {
    entries: Vec<MarkerEntry>,
}

impl MarkerSchema {
    /// Validate and freeze an ordered list of entries.
    pub fn new(entries: Vec<MarkerEntry>) -> Result<Self, SchemaError> {
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if a.path == b.path {
                    return Err(SchemaError::DuplicateKey {
                        key: a.path.to_string(),
                    });
                }
                if a.path.is_prefix_of(&b.path) {
                    return Err(SchemaError::PathConflict {
                        shorter: a.path.to_string(),
                        longer: b.path.to_string(),
                    });
                }
                if b.path.is_prefix_of(&a.path) {
                    return Err(SchemaError::PathConflict {
                        shorter: b.path.to_string(),
                        longer: a.path.to_string(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// The built-in catalog for the standard Korean residential lease form.
    ///
    /// Labels must match the markers as they appear in the source documents;
    /// the flexible matcher tolerates OCR whitespace inside them, so only
    /// the character sequence matters here. The order mirrors the form's
    /// reading order: landlord block, landlord's agent, tenant block,
    /// tenant's agent, then the flat contract terms.
    pub fn korean_lease() -> Self {
        let raw = [
            ("landlord.address", "임대인.주소"),
            ("landlord.registrationNumber", "임대인.주민등록번호"),
            ("landlord.phone", "임대인.전화"),
            ("landlord.name", "임대인.성명"),
            ("landlord.agent.address", "임대인.대리인.주소"),
            ("landlord.agent.registrationNumber", "임대인.대리인.주민등록번호"),
            ("landlord.agent.name", "임대인.대리인.성명"),
            ("tenant.address", "임차인.주소"),
            ("tenant.registrationNumber", "임차인.주민등록번호"),
            ("tenant.phone", "임차인.전화"),
            ("tenant.name", "임차인.성명"),
            ("tenant.agent.address", "임차인.대리인.주소"),
            ("tenant.agent.registrationNumber", "임차인.대리인.주민등록번호"),
            ("tenant.agent.name", "임차인.대리인.성명"),
            ("contractPeriod", "임대차계약 기간"),
            ("renewalRejectionReason", "계약갱신거절 사유"),
        ];
        let entries = raw
            .iter()
            .map(|(key, label)| MarkerEntry::new(key, label))
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in catalog is well-formed");
        Self::new(entries).expect("built-in catalog is well-formed")
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[MarkerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let p = DottedPath::parse("landlord.agent.name").unwrap();
        assert_eq!(p.segments(), ["landlord", "agent", "name"]);
        assert_eq!(p.to_string(), "landlord.agent.name");
    }

    #[test]
    fn parse_rejects_empty_and_dangling_segments() {
        assert!(DottedPath::parse("").is_err());
        assert!(DottedPath::parse("a..b").is_err());
        assert!(DottedPath::parse(".a").is_err());
        assert!(DottedPath::parse("a.").is_err());
    }

    #[test]
    fn prefix_detection() {
        let short = DottedPath::parse("landlord").unwrap();
        let long = DottedPath::parse("landlord.name").unwrap();
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        // Equal paths are not strict prefixes of each other
        assert!(!short.is_prefix_of(&short.clone()));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let entries = vec![
            MarkerEntry::new("landlord.name", "성명").unwrap(),
            MarkerEntry::new("landlord.name", "이름").unwrap(),
        ];
        assert_eq!(
            MarkerSchema::new(entries),
            Err(SchemaError::DuplicateKey {
                key: "landlord.name".into()
            })
        );
    }

    #[test]
    fn leaf_branch_conflict_rejected_both_directions() {
        let entries = vec![
            MarkerEntry::new("landlord", "임대인").unwrap(),
            MarkerEntry::new("landlord.name", "성명").unwrap(),
        ];
        assert!(matches!(
            MarkerSchema::new(entries),
            Err(SchemaError::PathConflict { .. })
        ));

        let entries = vec![
            MarkerEntry::new("landlord.name", "성명").unwrap(),
            MarkerEntry::new("landlord", "임대인").unwrap(),
        ];
        assert!(matches!(
            MarkerSchema::new(entries),
            Err(SchemaError::PathConflict { .. })
        ));
    }

    #[test]
    fn empty_label_rejected() {
        assert_eq!(
            MarkerEntry::new("landlord.name", "  "),
            Err(SchemaError::EmptyLabel {
                key: "landlord.name".into()
            })
        );
    }

    #[test]
    fn korean_lease_catalog_is_valid_and_ordered() {
        let schema = MarkerSchema::korean_lease();
        assert_eq!(schema.len(), 16);
        // Reading order: landlord block before tenant block, terms last
        assert_eq!(schema.entries()[0].path.to_string(), "landlord.address");
        assert_eq!(
            schema.entries()[15].path.to_string(),
            "renewalRejectionReason"
        );
    }
}
