//! Array cardinality validator

use crate::definition::Constraints;
use crate::error::{ErrorType, ValidationError};
use crate::traits::{FieldScope, ValidationRule};
use serde_json::Value;

/// Validator for the number of members of a list
#[derive(Debug, Clone)]
pub struct CountValidator {
    pub min_count: Option<usize>,
    pub max_count: Option<usize>,
}

impl CountValidator {
    pub fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            min_count: constraints.min_count,
            max_count: constraints.max_count,
        }
    }
}

impl ValidationRule for CountValidator {
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        let count = match value.as_array() {
            Some(items) => items.len(),
            None => return Ok(()),
        };

        if let Some(min) = self.min_count {
            if count < min {
                return Err(scope.error(ErrorType::MinCount, None));
            }
        }

        if let Some(max) = self.max_count {
            if count > max {
                return Err(scope.error(ErrorType::MaxCount, None));
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "count"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({
            "minCount": self.min_count,
            "maxCount": self.max_count,
        }))
    }
}
