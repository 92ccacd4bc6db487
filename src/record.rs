//! The output record: a nested tree whose leaves are extracted strings.
//!
//! ## Why pre-filled sentinels instead of `Option`?
//!
//! Every leaf path reachable from the schema exists in the record from the
//! moment it is created, holding the [`NO_INFO`] sentinel until a marker
//! match overwrites it. Downstream consumers (serialisation, serving layers)
//! therefore never need null checks — only a sentinel comparison — and the
//! JSON shape is identical for a perfect scan and a completely failed one.

use crate::error::SchemaError;
use crate::schema::{DottedPath, MarkerSchema};
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder stored in every leaf whose marker was not found.
pub const NO_INFO: &str = "no info";

/// A node in the record tree: either an extracted value or a nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(String),
    Branch(BTreeMap<String, Node>),
}

/// A nested string-leaf record, addressed by [`DottedPath`].
///
/// Branch nodes use `BTreeMap`, so serialisation order is deterministic
/// (lexicographic). The schema fixes the key *set*, not the key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionRecord {
    root: BTreeMap<String, Node>,
}

impl ExtractionRecord {
    /// An empty record with no paths.
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
        }
    }

    /// A record holding [`NO_INFO`] at every leaf path the schema can
    /// produce. This is the starting point of every extraction.
    pub fn prefilled(schema: &MarkerSchema) -> Self {
        let mut record = Self::new();
        for entry in schema.iter() {
            // The schema is validated, so these assignments cannot conflict.
            let _ = record.assign(&entry.path, NO_INFO.to_string());
        }
        record
    }

    /// Write `value` at `path`, creating intermediate branch nodes on
    /// demand.
    ///
    /// Fails only if an existing node blocks the walk (a leaf where a
    /// branch is needed or vice versa). With paths drawn from a validated
    /// [`MarkerSchema`] that cannot happen; the error exists for callers
    /// assembling records from unvalidated paths.
    pub fn assign(&mut self, path: &DottedPath, value: String) -> Result<(), SchemaError> {
        let segments = path.segments();
        let (leaf, branches) = segments
            .split_last()
            .expect("DottedPath always has at least one segment");

        let mut current = &mut self.root;
        let mut walked = Vec::with_capacity(branches.len());
        for segment in branches {
            walked.push(segment.as_str());
            let node = current
                .entry(segment.clone())
                .or_insert_with(|| Node::Branch(BTreeMap::new()));
            match node {
                Node::Branch(children) => current = children,
                Node::Leaf(_) => {
                    return Err(SchemaError::PathConflict {
                        shorter: walked.join("."),
                        longer: path.to_string(),
                    })
                }
            }
        }

        match current.get(leaf) {
            Some(Node::Branch(_)) => Err(SchemaError::PathConflict {
                shorter: path.to_string(),
                longer: format!("{path}.*"),
            }),
            _ => {
                current.insert(leaf.clone(), Node::Leaf(value));
                Ok(())
            }
        }
    }

    /// Read the leaf value at `path`, if present.
    pub fn get(&self, path: &DottedPath) -> Option<&str> {
        let mut current = &self.root;
        let (leaf, branches) = path.segments().split_last()?;
        for segment in branches {
            match current.get(segment)? {
                Node::Branch(children) => current = children,
                Node::Leaf(_) => return None,
            }
        }
        match current.get(leaf)? {
            Node::Leaf(value) => Some(value),
            Node::Branch(_) => None,
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        fn count(children: &BTreeMap<String, Node>) -> usize {
            children
                .values()
                .map(|n| match n {
                    Node::Leaf(_) => 1,
                    Node::Branch(c) => count(c),
                })
                .sum()
        }
        count(&self.root)
    }

    /// Number of leaves holding a real value (not [`NO_INFO`]).
    pub fn matched_count(&self) -> usize {
        fn count(children: &BTreeMap<String, Node>) -> usize {
            children
                .values()
                .map(|n| match n {
                    Node::Leaf(v) => usize::from(v != NO_INFO),
                    Node::Branch(c) => count(c),
                })
                .sum()
        }
        count(&self.root)
    }
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(key: &str) -> DottedPath {
        DottedPath::parse(key).unwrap()
    }

    #[test]
    fn assign_creates_intermediate_branches() {
        let mut record = ExtractionRecord::new();
        record
            .assign(&path("landlord.agent.name"), "김철수".into())
            .unwrap();
        assert_eq!(record.get(&path("landlord.agent.name")), Some("김철수"));
        assert_eq!(record.get(&path("landlord.name")), None);
    }

    #[test]
    fn assign_overwrites_existing_leaf() {
        let mut record = ExtractionRecord::new();
        record.assign(&path("tenant.name"), NO_INFO.into()).unwrap();
        record.assign(&path("tenant.name"), "홍길동".into()).unwrap();
        assert_eq!(record.get(&path("tenant.name")), Some("홍길동"));
    }

    #[test]
    fn assign_refuses_leaf_where_branch_exists() {
        let mut record = ExtractionRecord::new();
        record.assign(&path("landlord.name"), "홍길동".into()).unwrap();
        assert!(matches!(
            record.assign(&path("landlord"), "x".into()),
            Err(SchemaError::PathConflict { .. })
        ));
    }

    #[test]
    fn assign_refuses_branch_through_leaf() {
        let mut record = ExtractionRecord::new();
        record.assign(&path("landlord"), "x".into()).unwrap();
        assert!(matches!(
            record.assign(&path("landlord.name"), "홍길동".into()),
            Err(SchemaError::PathConflict { .. })
        ));
    }

    #[test]
    fn prefilled_covers_every_schema_path() {
        let schema = MarkerSchema::korean_lease();
        let record = ExtractionRecord::prefilled(&schema);
        assert_eq!(record.leaf_count(), schema.len());
        assert_eq!(record.matched_count(), 0);
        for entry in schema.iter() {
            assert_eq!(record.get(&entry.path), Some(NO_INFO), "{}", entry.path);
        }
    }

    #[test]
    fn serialises_to_nested_json() {
        let mut record = ExtractionRecord::new();
        record.assign(&path("landlord.name"), "홍길동".into()).unwrap();
        record.assign(&path("contractPeriod"), NO_INFO.into()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["landlord"]["name"], "홍길동");
        assert_eq!(json["contractPeriod"], "no info");
    }

    #[test]
    fn matched_count_ignores_sentinels() {
        let schema = MarkerSchema::korean_lease();
        let mut record = ExtractionRecord::prefilled(&schema);
        record.assign(&path("tenant.phone"), "010-1234-5678".into()).unwrap();
        assert_eq!(record.matched_count(), 1);
    }
}
