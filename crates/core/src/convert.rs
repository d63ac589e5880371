//! Type converters and the conversion pass.
//!
//! A converter coerces a source field's value toward the type the target
//! record carries. Converters are keyed by source field name and run only
//! against fields the differencer has classified as type-mismatched. A
//! converter that fails leaves the working copy untouched; the failure is
//! recorded on the difference entry and the pipeline continues.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::diff::{Difference, DifferenceKind};
use crate::errors::ConvertError;
use crate::value::{Record, TypeTag};

/// A type-coercion function for a single field. Must be pure with respect
/// to shared state; the engine may be called from multiple threads.
pub type Converter = Box<dyn Fn(&Value) -> Result<Value, ConvertError> + Send + Sync>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Converters keyed by source field name.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Converter>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a source field. A later registration for
    /// the same field replaces the earlier one.
    pub fn register(&mut self, field: impl Into<String>, converter: Converter) {
        self.converters.insert(field.into(), converter);
    }

    /// Register a plain closure as a converter.
    pub fn register_fn<F>(&mut self, field: impl Into<String>, converter: F)
    where
        F: Fn(&Value) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        self.register(field, Box::new(converter));
    }

    /// True when a converter is registered for the field.
    pub fn contains(&self, field: &str) -> bool {
        self.converters.contains_key(field)
    }

    /// Look up the converter for a field.
    pub fn get(&self, field: &str) -> Option<&Converter> {
        self.converters.get(field)
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// True when no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        fields.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("fields", &fields)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in coercions
// ---------------------------------------------------------------------------

/// Built-in coercions addressable by name from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Parse strings (and booleans) into numbers.
    Number,
    /// Render scalars as strings.
    Text,
    /// Parse strings and numbers into booleans.
    Boolean,
}

impl Coercion {
    /// Resolve a coercion by its configuration-file name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "number" => Some(Self::Number),
            "string" | "text" => Some(Self::Text),
            "boolean" | "bool" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Produce the converter function for this coercion.
    pub fn into_converter(self) -> Converter {
        match self {
            Self::Number => Box::new(to_number),
            Self::Text => Box::new(to_text),
            Self::Boolean => Box::new(to_boolean),
        }
    }
}

impl std::fmt::Display for Coercion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Text => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

fn to_number(value: &Value) -> Result<Value, ConvertError> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Value::from(int));
            }
            if let Ok(float) = trimmed.parse::<f64>() {
                if let Some(number) = serde_json::Number::from_f64(float) {
                    return Ok(Value::Number(number));
                }
            }
            Err(ConvertError::InvalidNumber(s.clone()))
        }
        Value::Bool(b) => Ok(Value::from(*b as i64)),
        other => Err(ConvertError::UnsupportedType(TypeTag::of(other))),
    }
}

fn to_text(value: &Value) -> Result<Value, ConvertError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(ConvertError::UnsupportedType(TypeTag::of(other))),
    }
}

fn to_boolean(value: &Value) -> Result<Value, ConvertError> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(ConvertError::InvalidBoolean(s.clone())),
        },
        Value::Number(n) => Ok(Value::Bool(n.as_f64().map_or(false, |f| f != 0.0))),
        other => Err(ConvertError::UnsupportedType(TypeTag::of(other))),
    }
}

// ---------------------------------------------------------------------------
// Conversion pass
// ---------------------------------------------------------------------------

/// The conversion pass over a detected difference list.
pub struct ConversionEngine;

impl ConversionEngine {
    /// Run registered converters against every type-mismatched field.
    ///
    /// Success rewrites the working copy in place and marks the difference
    /// resolved. Failure leaves the working copy untouched and records the
    /// converter's message. Differences of other kinds pass through.
    pub fn apply(
        working: &mut Record,
        differences: &mut [Difference],
        registry: &ConverterRegistry,
    ) {
        for diff in differences.iter_mut() {
            if diff.kind != DifferenceKind::TypeMismatch {
                continue;
            }
            let converter = match registry.get(&diff.field) {
                Some(c) => c,
                None => continue,
            };
            let current = match working.get(&diff.field) {
                Some(v) => v,
                None => continue,
            };

            match converter(current) {
                Ok(converted) => {
                    working.insert(diff.field.clone(), converted);
                    diff.resolved = Some(true);
                    diff.solution = "auto-converted".to_string();
                }
                Err(e) => {
                    diff.resolved = Some(false);
                    diff.solution = format!("conversion failed: {}", e);
                }
            }
        }
    }
}
