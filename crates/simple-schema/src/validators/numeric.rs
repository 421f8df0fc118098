//! Numeric value validators

use crate::definition::Constraints;
use crate::error::{ErrorType, ValidationError};
use crate::traits::{FieldScope, ValidationRule};
use serde_json::Value;

/// Validator for numeric bounds
#[derive(Debug, Clone)]
pub struct NumericValidator {
    /// Minimum value (inclusive unless `exclusive_min`)
    pub min: Option<f64>,
    /// Maximum value (inclusive unless `exclusive_max`)
    pub max: Option<f64>,
    pub exclusive_min: bool,
    pub exclusive_max: bool,
}

impl NumericValidator {
    /// Take bounds from a field's constraint set
    pub fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            min: constraints.min,
            max: constraints.max,
            exclusive_min: constraints.exclusive_min.unwrap_or(false),
            exclusive_max: constraints.exclusive_max.unwrap_or(false),
        }
    }

    fn violation(&self, num: f64) -> Option<ErrorType> {
        if let Some(min) = self.min {
            if self.exclusive_min && num <= min {
                return Some(ErrorType::MinNumberExclusive);
            }
            if num < min {
                return Some(ErrorType::MinNumber);
            }
        }

        if let Some(max) = self.max {
            if self.exclusive_max && num >= max {
                return Some(ErrorType::MaxNumberExclusive);
            }
            if num > max {
                return Some(ErrorType::MaxNumber);
            }
        }

        None
    }
}

impl ValidationRule for NumericValidator {
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        // Non-numbers are the type check's concern
        let num = match value.as_f64() {
            Some(num) if num.is_finite() => num,
            _ => return Ok(()),
        };

        match self.violation(num) {
            Some(error_type) => Err(scope.error(error_type, Some(value))),
            None => Ok(()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "numeric"
    }

    fn parameters(&self) -> Option<Value> {
        let mut params = serde_json::Map::new();

        if let Some(min) = self.min {
            params.insert("min".to_string(), serde_json::json!(min));
        }
        if let Some(max) = self.max {
            params.insert("max".to_string(), serde_json::json!(max));
        }
        params.insert("exclusiveMin".to_string(), Value::Bool(self.exclusive_min));
        params.insert("exclusiveMax".to_string(), Value::Bool(self.exclusive_max));

        Some(Value::Object(params))
    }
}
