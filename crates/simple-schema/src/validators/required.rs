//! Required field validator

use crate::error::{ErrorType, ValidationError};
use crate::traits::FieldScope;
use serde_json::Value;

/// Validator that ensures a non-optional key is present.
///
/// Only an absent key or `null` count as missing; empty strings and empty
/// lists are present values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl RequiredValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check if a value counts as missing
    pub fn is_missing(value: Option<&Value>) -> bool {
        value.map_or(true, Value::is_null)
    }

    pub fn check(&self, value: Option<&Value>, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        if scope.constraints.is_optional() || !Self::is_missing(value) {
            return Ok(());
        }
        Err(scope.error(ErrorType::Required, None))
    }

    pub fn rule_name(&self) -> &'static str {
        "required"
    }
}
