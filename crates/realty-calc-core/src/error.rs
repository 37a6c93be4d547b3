use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtyCalcError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RealtyCalcError {
    /// Messages a form can show next to its inputs. Empty for failures that
    /// are not tied to a field.
    pub fn field_errors(&self) -> ValidationErrors {
        match self {
            RealtyCalcError::Validation(errors) => errors.clone(),
            RealtyCalcError::InvalidInput { field, reason } => {
                let mut errors = ValidationErrors::new();
                errors.add(field, reason.clone());
                errors
            }
            _ => ValidationErrors::new(),
        }
    }

    /// `{"message": ..., "errors": {field: message}}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.to_string(),
            "errors": self.field_errors(),
        })
    }
}

impl From<serde_json::Error> for RealtyCalcError {
    fn from(e: serde_json::Error) -> Self {
        RealtyCalcError::SerializationError(e.to_string())
    }
}

impl From<ValidationErrors> for RealtyCalcError {
    fn from(e: ValidationErrors) -> Self {
        RealtyCalcError::Validation(e)
    }
}

/// Failure to read a raw form value as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    Malformed(String),
}

/// Per-field validation messages, keyed by form field name.
///
/// A calculation only runs when this map is empty; otherwise the whole map
/// is handed back to the caller so every offending field can be flagged at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first message recorded for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.0.entry(field).or_insert(message);
        }
    }

    /// `Ok(value)` when no errors were recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
