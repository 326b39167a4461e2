//! Configuration-time validation of query options

pub mod limits;
pub mod rules;
pub mod validators;

pub use limits::{AggregateLimits, SearchLimits};
pub use rules::*;
pub use validators::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

/// Outcome of validating one set of options.
///
/// Errors are keyed by field path and kept sorted so messages are stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
    pub field_errors: BTreeMap<String, FieldValidationError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValidationError {
    pub field: String,
    pub errors: Vec<String>,
    pub error_codes: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self::success();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Validation failed for field '{}'", field),
                };
                result.push(&field.to_string(), message, error.code.to_string());
            }
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.push(field, message.to_string(), "custom".to_string());
    }

    fn push(&mut self, field: &str, message: String, code: String) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.clone());

        let entry = self
            .field_errors
            .entry(field.to_string())
            .or_insert_with(|| FieldValidationError {
                field: field.to_string(),
                errors: Vec::new(),
                error_codes: Vec::new(),
            });
        entry.errors.push(message);
        entry.error_codes.push(code);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for (field, field_error) in other.field_errors {
            for (message, code) in field_error.errors.into_iter().zip(field_error.error_codes) {
                self.push(&field, message, code);
            }
        }
        if !other.is_valid {
            self.is_valid = false;
        }
    }

    /// `field: message` pairs joined with `; `.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}: {}", field, m)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Converts into a `Result`, failing with `QueryError::Validation` when invalid.
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

pub trait Validatable {
    fn validate_comprehensive(&self) -> ValidationResult;
}

impl<T> Validatable for T
where
    T: Validate,
{
    fn validate_comprehensive(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => ValidationResult::from_validation_errors(errors),
        }
    }
}
