//! Allowed-values validator

use crate::error::{ErrorType, ValidationError};
use crate::traits::{FieldScope, ValidationRule};
use serde_json::Value;

/// Validator that a value is one of a fixed set.
///
/// For lists every member must be allowed.
#[derive(Debug, Clone)]
pub struct AllowedValuesValidator {
    pub values: Vec<Value>,
}

impl AllowedValuesValidator {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Check membership; numbers compare by value so `5` matches `5.0`
    pub fn allows(&self, value: &Value) -> bool {
        self.values.iter().any(|allowed| same_value(allowed, value))
    }
}

impl ValidationRule for AllowedValuesValidator {
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        let offending = match value {
            Value::Array(items) => items.iter().find(|item| !self.allows(item)),
            single if !self.allows(single) => Some(single),
            _ => None,
        };

        match offending {
            Some(offending) => Err(scope.error(ErrorType::NotAllowed, Some(offending))),
            None => Ok(()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "allowed_values"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({ "allowedValues": self.values }))
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
