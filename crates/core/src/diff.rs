//! Field-by-field difference detection.
//!
//! The differencer walks the source record in field order, translating each
//! field name through the mapping, and classifies what it finds on the
//! target side. A second pass walks the target record for fields no source
//! field reaches. The passes keep their order: source-pass entries always
//! precede target-only entries, so reports are reproducible.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::convert::ConverterRegistry;
use crate::mapping::FieldMap;
use crate::value::{canonical_eq, Record, TypeTag};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Classification of a single field discrepancy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// The source field has no counterpart in the target record.
    MissingInTarget,
    /// Both records carry the field, with different type tags.
    TypeMismatch,
    /// Same type tag, canonically unequal values.
    ValueMismatch,
    /// The target field is reachable from no source field.
    ExtraInTarget,
}

impl std::fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInTarget => write!(f, "missing_in_target"),
            Self::TypeMismatch => write!(f, "type_mismatch"),
            Self::ValueMismatch => write!(f, "value_mismatch"),
            Self::ExtraInTarget => write!(f, "extra_in_target"),
        }
    }
}

/// One classified discrepancy between the two records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difference {
    /// Field name: the source-side name for source-pass entries, the
    /// target-side name for extra-in-target entries.
    pub field: String,
    /// Value on the source side, when the field exists there.
    pub source_value: Option<Value>,
    /// Value on the target side (after name translation), when present.
    pub target_value: Option<Value>,
    /// What kind of discrepancy this is.
    pub kind: DifferenceKind,
    /// Suggested handling; rewritten by the conversion pass.
    pub solution: String,
    /// Conversion outcome. Only ever set for type mismatches; `None`
    /// counts as unresolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

impl Difference {
    /// True unless a conversion explicitly resolved this difference.
    pub fn is_unresolved(&self) -> bool {
        self.resolved != Some(true)
    }
}

// ---------------------------------------------------------------------------
// Differencer
// ---------------------------------------------------------------------------

/// Stateless field differencer.
pub struct Differencer;

impl Differencer {
    /// Compare the two records and return classified differences in
    /// deterministic order.
    ///
    /// The converter registry is consulted only to word the suggested
    /// solution for type mismatches; no conversion happens here.
    pub fn detect(
        source: &Record,
        target: &Record,
        map: &FieldMap,
        converters: &ConverterRegistry,
    ) -> Vec<Difference> {
        let mut differences = Vec::new();

        // Pass 1: source fields, in record order.
        for (field, source_value) in source {
            let target_key = map.to_target(field);
            let target_value = match target.get(target_key) {
                Some(v) => v,
                None => {
                    differences.push(Difference {
                        field: field.clone(),
                        source_value: Some(source_value.clone()),
                        target_value: None,
                        kind: DifferenceKind::MissingInTarget,
                        solution: format!("add field '{}' to target", target_key),
                        resolved: None,
                    });
                    continue;
                }
            };

            if TypeTag::of(source_value) != TypeTag::of(target_value) {
                let solution = if converters.contains(field) {
                    format!("use registered converter for '{}'", field)
                } else {
                    "needs manual type conversion".to_string()
                };
                differences.push(Difference {
                    field: field.clone(),
                    source_value: Some(source_value.clone()),
                    target_value: Some(target_value.clone()),
                    kind: DifferenceKind::TypeMismatch,
                    solution,
                    resolved: None,
                });
            } else if !canonical_eq(source_value, target_value) {
                differences.push(Difference {
                    field: field.clone(),
                    source_value: Some(source_value.clone()),
                    target_value: Some(target_value.clone()),
                    kind: DifferenceKind::ValueMismatch,
                    solution: "merge or update".to_string(),
                    resolved: None,
                });
            }
        }

        // Pass 2: target fields no source field reaches.
        for (field, target_value) in target {
            let source_key = map.to_source(field);
            if !source.contains_key(source_key) {
                differences.push(Difference {
                    field: field.clone(),
                    source_value: None,
                    target_value: Some(target_value.clone()),
                    kind: DifferenceKind::ExtraInTarget,
                    solution: format!("copy field '{}' from target into source", field),
                    resolved: None,
                });
            }
        }

        differences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("test record must be an object").clone()
    }

    fn detect(source: &Record, target: &Record, map: &FieldMap) -> Vec<Difference> {
        Differencer::detect(source, target, map, &ConverterRegistry::new())
    }

    #[test]
    fn test_identical_records_no_differences() {
        let source = record(json!({"a": 1, "b": "x"}));
        let target = record(json!({"a": 1, "b": "x"}));
        assert!(detect(&source, &target, &FieldMap::default()).is_empty());
    }

    #[test]
    fn test_missing_in_target_uses_mapped_name() {
        let map = FieldMap::new([("userName", "username")]);
        let source = record(json!({"userName": "alice"}));
        let target = record(json!({}));

        let diffs = detect(&source, &target, &map);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::MissingInTarget);
        assert_eq!(diffs[0].field, "userName");
        assert_eq!(diffs[0].solution, "add field 'username' to target");
        assert!(diffs[0].target_value.is_none());
    }

    #[test]
    fn test_mapped_field_compares_against_target_name() {
        let map = FieldMap::new([("userName", "username")]);
        let source = record(json!({"userName": "alice"}));
        let target = record(json!({"username": "alice"}));
        assert!(detect(&source, &target, &map).is_empty());
    }

    #[test]
    fn test_value_mismatch() {
        let source = record(json!({"status": "open"}));
        let target = record(json!({"status": "closed"}));

        let diffs = detect(&source, &target, &FieldMap::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::ValueMismatch);
        assert_eq!(diffs[0].solution, "merge or update");
        assert!(diffs[0].is_unresolved());
    }

    #[test]
    fn test_type_mismatch_without_converter() {
        let source = record(json!({"age": "30"}));
        let target = record(json!({"age": 30}));

        let diffs = detect(&source, &target, &FieldMap::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::TypeMismatch);
        assert_eq!(diffs[0].solution, "needs manual type conversion");
    }

    #[test]
    fn test_type_mismatch_with_converter_names_it() {
        let mut converters = ConverterRegistry::new();
        converters.register_fn("age", |v| Ok(v.clone()));

        let source = record(json!({"age": "30"}));
        let target = record(json!({"age": 30}));

        let diffs = Differencer::detect(&source, &target, &FieldMap::default(), &converters);
        assert_eq!(diffs[0].solution, "use registered converter for 'age'");
    }

    #[test]
    fn test_extra_in_target() {
        let source = record(json!({"a": 1}));
        let target = record(json!({"a": 1, "c": 3}));

        let diffs = detect(&source, &target, &FieldMap::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::ExtraInTarget);
        assert_eq!(diffs[0].field, "c");
        assert_eq!(diffs[0].solution, "copy field 'c' from target into source");
        assert!(diffs[0].source_value.is_none());
    }

    #[test]
    fn test_mapped_target_field_is_not_extra() {
        // target "username" is fed by source "userName", so pass 2 must
        // not flag it even though the names differ.
        let map = FieldMap::new([("userName", "username")]);
        let source = record(json!({"userName": "alice"}));
        let target = record(json!({"username": "bob"}));

        let diffs = detect(&source, &target, &map);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::ValueMismatch);
    }

    #[test]
    fn test_source_pass_precedes_target_pass() {
        let source = record(json!({"a": 1, "b": 2}));
        let target = record(json!({"c": 3, "a": 2}));

        let diffs = detect(&source, &target, &FieldMap::default());
        let kinds: Vec<DifferenceKind> = diffs.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DifferenceKind::ValueMismatch,
                DifferenceKind::MissingInTarget,
                DifferenceKind::ExtraInTarget,
            ]
        );
    }

    #[test]
    fn test_explicit_null_differs_from_absent() {
        // An explicit null on both sides is equality, not a difference.
        let source = record(json!({"x": null}));
        let target = record(json!({"x": null}));
        assert!(detect(&source, &target, &FieldMap::default()).is_empty());

        // An explicit null with the field absent on the other side is
        // missing, not equal.
        let target = record(json!({}));
        let diffs = detect(&source, &target, &FieldMap::default());
        assert_eq!(diffs[0].kind, DifferenceKind::MissingInTarget);
    }

    #[test]
    fn test_null_vs_mapping_is_type_mismatch() {
        let source = record(json!({"meta": null}));
        let target = record(json!({"meta": {}}));

        let diffs = detect(&source, &target, &FieldMap::default());
        assert_eq!(diffs[0].kind, DifferenceKind::TypeMismatch);
    }

    #[test]
    fn test_sequence_vs_mapping_is_type_mismatch() {
        let source = record(json!({"tags": ["a"]}));
        let target = record(json!({"tags": {"a": true}}));

        let diffs = detect(&source, &target, &FieldMap::default());
        assert_eq!(diffs[0].kind, DifferenceKind::TypeMismatch);
    }

    #[test]
    fn test_mapping_values_compare_canonically() {
        let source = record(json!({"address": {"street": "Main", "no": 4}}));
        let target = record(json!({"address": {"no": 4, "street": "Main"}}));
        assert!(detect(&source, &target, &FieldMap::default()).is_empty());
    }

    #[test]
    fn test_difference_count_bound() {
        let source = record(json!({"a": 1, "b": "2", "c": null}));
        let target = record(json!({"a": 9, "b": 2, "d": [1], "e": {}}));

        let diffs = detect(&source, &target, &FieldMap::default());
        assert!(diffs.len() <= source.len() + target.len());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DifferenceKind::MissingInTarget.to_string(), "missing_in_target");
        assert_eq!(DifferenceKind::ExtraInTarget.to_string(), "extra_in_target");
    }
}
