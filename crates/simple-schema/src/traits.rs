//! Core validation traits

use crate::definition::{Constraints, SchemaType};
use crate::error::{ErrorType, ValidationError};
use serde_json::Value;

/// What a rule knows about the key it is checking
#[derive(Debug, Clone, Copy)]
pub struct FieldScope<'a> {
    /// Concrete key path, used as the error name
    pub name: &'a str,
    /// Display label used in messages
    pub label: &'a str,
    /// Type being checked (one alternative, for unions)
    pub ty: &'a SchemaType,
    pub constraints: &'a Constraints,
}

impl<'a> FieldScope<'a> {
    /// Build an error of the given kind with the default message
    pub fn error(&self, error_type: ErrorType, value: Option<&Value>) -> ValidationError {
        let message = error_type.describe(self.name, self.label, self.ty, self.constraints, value);
        let error = ValidationError::new(self.name, error_type, message);
        match value {
            Some(value) => error.with_value(value.clone()),
            None => error,
        }
    }
}

/// A check on a single present (non-null) value.
///
/// Rules never see absent values; presence is handled by the required check.
pub trait ValidationRule: Send + Sync {
    /// Validate a single value
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError>;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;

    /// Get validation rule parameters/configuration as JSON
    fn parameters(&self) -> Option<Value> {
        None
    }
}
