//! Canonical record construction.
//!
//! The merger applies the field mapping to the converted working copy:
//! every mapped source field is rewritten under its target name, in
//! declaration order, and the source name is dropped when the two differ.
//! Unmapped fields carry over unchanged.

use crate::mapping::FieldMap;
use crate::value::Record;

/// Stateless merge step.
pub struct Merger;

impl Merger {
    /// Apply the field mapping to the working copy, producing the
    /// canonical record.
    ///
    /// Pairs apply in declaration order; when two source fields map to the
    /// same target name, the later-applied write wins. A pair whose source
    /// field is absent from the working copy is skipped.
    pub fn apply(mut working: Record, map: &FieldMap) -> Record {
        for pair in map.pairs() {
            let value = match working.get(&pair.source) {
                Some(v) => v.clone(),
                None => continue,
            };
            working.insert(pair.target.clone(), value);
            if pair.source != pair.target {
                // shift_remove keeps the remaining fields in order.
                working.shift_remove(&pair.source);
            }
        }
        working
    }
}
