//! Runtime type check for a single value

use crate::definition::SchemaType;
use crate::error::{ErrorType, ValidationError};
use crate::traits::{FieldScope, ValidationRule};
use serde_json::Value;

/// Validator that a value has the declared type
#[derive(Debug, Clone)]
pub struct TypeValidator {
    pub ty: SchemaType,
}

impl TypeValidator {
    pub fn new(ty: SchemaType) -> Self {
        Self { ty }
    }

    /// The error kind for `value`, if it does not fit `ty`
    pub fn mismatch(ty: &SchemaType, value: &Value) -> Option<ErrorType> {
        let fits = match ty {
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.as_f64().map_or(false, f64::is_finite),
            SchemaType::Integer => {
                let number = match value.as_f64() {
                    Some(n) if n.is_finite() => n,
                    _ => return Some(ErrorType::ExpectedType),
                };
                if number.fract() != 0.0 {
                    return Some(ErrorType::NoDecimal);
                }
                true
            }
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Array => value.is_array(),
            SchemaType::Object | SchemaType::Schema(_) => value.is_object(),
            SchemaType::Any => true,
            SchemaType::OneOf(types) => types
                .iter()
                .any(|alternative| Self::mismatch(alternative, value).is_none()),
        };
        if fits {
            None
        } else {
            Some(ErrorType::ExpectedType)
        }
    }
}

impl ValidationRule for TypeValidator {
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        match Self::mismatch(&self.ty, value) {
            Some(error_type) => Err(scope.error(error_type, Some(value))),
            None => Ok(()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "type"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({ "type": self.ty.name() }))
    }
}
