//! Difference report rendering.
//!
//! The report generator turns a difference list into a displayable Markdown
//! table and the overall unresolved flag. The full [`ReconciliationReport`]
//! also carries the three records, so a downstream handler can inspect the
//! whole outcome of a run.

use serde::Serialize;
use serde_json::Value;

use crate::diff::Difference;
use crate::value::Record;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// The full outcome of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    /// Classified differences, in detection order.
    pub differences: Vec<Difference>,
    /// Markdown rendering of the differences; `None` when there are none.
    pub markdown_table: Option<String>,
    /// True when at least one difference was not auto-resolved.
    pub has_unresolved: bool,
    /// The caller's source record, untouched.
    pub source_record: Record,
    /// The caller's target record, untouched.
    pub target_record: Record,
    /// The merged canonical record.
    pub canonical_record: Record,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Renders difference lists into displayable form.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Render the differences as a Markdown table, one row per difference.
    /// Returns `None` for an empty list.
    ///
    /// Cell text is escaped so that field names or values containing the
    /// column delimiter cannot change the table's shape.
    pub fn markdown_table(differences: &[Difference]) -> Option<String> {
        if differences.is_empty() {
            return None;
        }

        let mut table = String::from(
            "| Field | Source Value | Target Value | Kind | Solution |\n\
             | --- | --- | --- | --- | --- |\n",
        );
        for diff in differences {
            let solution = if diff.solution.is_empty() {
                "needs manual handling"
            } else {
                diff.solution.as_str()
            };
            table.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                escape_cell(&diff.field),
                escape_cell(&render_value(diff.source_value.as_ref())),
                escape_cell(&render_value(diff.target_value.as_ref())),
                diff.kind,
                escape_cell(solution),
            ));
        }
        Some(table)
    }

    /// True when any difference remains unresolved.
    pub fn has_unresolved(differences: &[Difference]) -> bool {
        differences.iter().any(Difference::is_unresolved)
    }
}

/// Render an optional field value as compact JSON, or a placeholder when
/// the field is absent on that side.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(absent)".to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
