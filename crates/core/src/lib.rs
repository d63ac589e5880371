//! RecordRecon core library.
//!
//! This crate implements a configurable record reconciliation pipeline: it
//! compares two differently-shaped representations of the same logical
//! entity, classifies their differences, coerces type-mismatched fields
//! through registered converters, and merges the result into a canonical
//! record with a structured audit report.
//!
//! The engine performs no I/O and holds no state across calls; see
//! [`recon_engine::ReconEngine`] for the pipeline and [`recon_engine::wrap`]
//! for the middleware form.

pub mod config;
pub mod convert;
pub mod diff;
pub mod errors;
pub mod mapping;
pub mod merge;
pub mod recon_engine;
pub mod report;
pub mod value;

// Re-exports for convenience.
pub use config::ReconcileConfig;
pub use diff::{Difference, DifferenceKind, Differencer};
pub use mapping::FieldMap;
pub use recon_engine::{wrap, ReconEngine};
pub use report::ReconciliationReport;
pub use value::{Record, TypeTag};
