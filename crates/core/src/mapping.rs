//! Field-name translation between source and target records.
//!
//! A [`FieldMap`] is declared as an ordered list of source -> target pairs.
//! It owns both lookup directions: the forward table translates source field
//! names during diffing and merging, and the reverse table lets the
//! differencer decide whether a target-only field is genuinely extra.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single declared source -> target field correspondence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldPair {
    /// Field name on the source record.
    pub source: String,
    /// Field name the target record uses for the same datum.
    pub target: String,
}

/// Bidirectional field-name mapping.
///
/// Declaration order is preserved and the merge step applies pairs in that
/// order. When two source fields declare the same target field, the later
/// declaration wins in the reverse table, and the later-applied write wins
/// at merge time. Construction never rejects collisions; callers that want
/// to surface them use [`FieldMap::collisions`].
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    pairs: Vec<FieldPair>,
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl FieldMap {
    /// Build a mapping from `(source, target)` pairs, in order.
    pub fn new<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut map = Self::default();
        for (source, target) in pairs {
            map.push(source.into(), target.into());
        }
        map
    }

    /// Build a mapping from declared [`FieldPair`]s, in order.
    pub fn from_pairs(pairs: Vec<FieldPair>) -> Self {
        Self::new(pairs.into_iter().map(|p| (p.source, p.target)))
    }

    /// Append one source -> target declaration.
    pub fn push(&mut self, source: String, target: String) {
        self.forward.insert(source.clone(), target.clone());
        self.reverse.insert(target.clone(), source.clone());
        self.pairs.push(FieldPair { source, target });
    }

    /// Translate a source field name to its target-side name.
    /// Unmapped fields keep their own name.
    pub fn to_target<'a>(&'a self, source_field: &'a str) -> &'a str {
        self.forward
            .get(source_field)
            .map(String::as_str)
            .unwrap_or(source_field)
    }

    /// Translate a target field name back to the source field that feeds
    /// it. Unmapped fields keep their own name.
    pub fn to_source<'a>(&'a self, target_field: &'a str) -> &'a str {
        self.reverse
            .get(target_field)
            .map(String::as_str)
            .unwrap_or(target_field)
    }

    /// The declared pairs, in declaration order.
    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    /// Number of declared pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no pairs are declared.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Target field names fed by more than one distinct source field,
    /// in first-declared order.
    pub fn collisions(&self) -> Vec<String> {
        let mut sources_by_target: HashMap<&str, Vec<&str>> = HashMap::new();
        for pair in &self.pairs {
            let sources = sources_by_target.entry(pair.target.as_str()).or_default();
            if !sources.contains(&pair.source.as_str()) {
                sources.push(pair.source.as_str());
            }
        }

        let mut colliding = Vec::new();
        for pair in &self.pairs {
            let target = pair.target.as_str();
            if sources_by_target[target].len() > 1 && !colliding.iter().any(|t| t == target) {
                colliding.push(target.to_string());
            }
        }
        colliding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_and_reverse_lookup() {
        let map = FieldMap::new([("userName", "username"), ("zip", "postal_code")]);
        assert_eq!(map.to_target("userName"), "username");
        assert_eq!(map.to_source("username"), "userName");
        assert_eq!(map.to_source("postal_code"), "zip");
    }

    #[test]
    fn test_unmapped_fields_pass_through() {
        let map = FieldMap::new([("a", "b")]);
        assert_eq!(map.to_target("unmapped"), "unmapped");
        assert_eq!(map.to_source("unmapped"), "unmapped");
    }

    #[test]
    fn test_empty_map() {
        let map = FieldMap::default();
        assert!(map.is_empty());
        assert_eq!(map.to_target("x"), "x");
        assert_eq!(map.to_source("x"), "x");
    }

    #[test]
    fn test_reverse_collision_last_declared_wins() {
        let map = FieldMap::new([("first", "name"), ("second", "name")]);
        assert_eq!(map.to_source("name"), "second");
        // Forward lookups are unaffected by the collision.
        assert_eq!(map.to_target("first"), "name");
        assert_eq!(map.to_target("second"), "name");
    }

    #[test]
    fn test_collisions_reported_in_order() {
        let map = FieldMap::new([
            ("a", "x"),
            ("b", "y"),
            ("c", "x"),
            ("d", "z"),
            ("e", "z"),
        ]);
        assert_eq!(map.collisions(), vec!["x".to_string(), "z".to_string()]);
    }

    #[test]
    fn test_no_collisions() {
        let map = FieldMap::new([("a", "x"), ("b", "y")]);
        assert!(map.collisions().is_empty());
    }

    #[test]
    fn test_pairs_preserve_declaration_order() {
        let map = FieldMap::new([("z", "1"), ("a", "2"), ("m", "3")]);
        let sources: Vec<&str> = map.pairs().iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, vec!["z", "a", "m"]);
    }
}
