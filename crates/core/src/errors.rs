//! Error types for the reconciliation core.
//!
//! The reconciliation pipeline itself never fails: every discrepancy,
//! including a converter error, is folded into the difference report. The
//! types here cover the crate's fallible edges -- converter execution and
//! configuration loading.

use thiserror::Error;

use crate::value::TypeTag;

// ---------------------------------------------------------------------------
// Converter errors
// ---------------------------------------------------------------------------

/// Errors produced by type converters.
///
/// A converter failure never escapes the pipeline; it is caught at the
/// conversion site and recorded on the difference entry it belongs to.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The value's text does not parse as a number.
    #[error("cannot parse '{0}' as a number")]
    InvalidNumber(String),

    /// The value's text is not a recognised boolean.
    #[error("cannot parse '{0}' as a boolean")]
    InvalidBoolean(String),

    /// The converter does not support values of this type.
    #[error("cannot convert a {0} value")]
    UnsupportedType(TypeTag),

    /// A caller-supplied converter failed with its own message.
    #[error("{0}")]
    Custom(String),
}

impl ConvertError {
    /// Build a custom converter error from any displayable message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A converter entry names a coercion this crate does not provide.
    #[error("unknown coercion '{name}' for field '{field}'")]
    UnknownCoercion { field: String, name: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
