//! The reconciliation pipeline.
//!
//! [`ReconEngine`] wires the stages together: translate field names through
//! the mapping, detect differences, run registered converters against the
//! working copy, merge into a canonical record, and render the report. One
//! call is one linear pass; the engine holds no state between calls, so a
//! single engine can serve concurrent callers.
//!
//! [`wrap`] is the middleware form: it turns a downstream handler into one
//! that receives the canonical record, the untouched target record, and the
//! full report in place of the raw source record.

use tracing::debug;

use crate::config::ReconcileConfig;
use crate::convert::ConversionEngine;
use crate::diff::Differencer;
use crate::merge::Merger;
use crate::report::{ReconciliationReport, ReportGenerator};
use crate::value::Record;

/// The record reconciliation engine.
pub struct ReconEngine {
    config: ReconcileConfig,
}

impl ReconEngine {
    /// Create an engine around a prepared configuration.
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run the full pipeline over one record pair.
    ///
    /// Never fails: converter errors are folded into the report, and the
    /// worst outcome is `has_unresolved = true`. The caller's records are
    /// not mutated; conversions run against a working copy.
    pub fn reconcile(&self, source: &Record, target: &Record) -> ReconciliationReport {
        if self.config.debug {
            debug!(
                source_fields = source.len(),
                target_fields = target.len(),
                "starting record diff"
            );
        }
        let mut differences = Differencer::detect(
            source,
            target,
            &self.config.field_map,
            &self.config.converters,
        );
        if self.config.debug {
            debug!(differences = differences.len(), "record diff complete");
        }

        let mut working = source.clone();
        ConversionEngine::apply(&mut working, &mut differences, &self.config.converters);

        let canonical_record = Merger::apply(working, &self.config.field_map);

        let markdown_table = ReportGenerator::markdown_table(&differences);
        let has_unresolved = ReportGenerator::has_unresolved(&differences);

        ReconciliationReport {
            differences,
            markdown_table,
            has_unresolved,
            source_record: source.clone(),
            target_record: target.clone(),
            canonical_record,
        }
    }
}

/// Wrap a downstream handler so that callers invoke it exactly like the
/// original, but it receives the canonical record, the untouched target
/// record, and the reconciliation report.
///
/// The handler's result is returned unmodified. Extra call context beyond
/// the two records is captured by the handler closure itself.
pub fn wrap<H, R>(config: ReconcileConfig, handler: H) -> impl Fn(&Record, &Record) -> R
where
    H: Fn(Record, Record, ReconciliationReport) -> R,
{
    let engine = ReconEngine::new(config);
    move |source: &Record, target: &Record| {
        let report = engine.reconcile(source, target);
        handler(report.canonical_record.clone(), target.clone(), report)
    }
}
