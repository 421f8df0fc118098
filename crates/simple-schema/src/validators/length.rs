//! String length validator

use crate::definition::Constraints;
use crate::error::{ErrorType, ValidationError};
use crate::traits::{FieldScope, ValidationRule};
use serde_json::Value;

/// Validator for string length bounds; `min`/`max` on a String field
#[derive(Debug, Clone)]
pub struct LengthValidator {
    /// Minimum length (inclusive)
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    pub max: Option<usize>,
}

impl LengthValidator {
    /// Take bounds from a field's constraint set
    pub fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            min: constraints.min.map(|min| min.max(0.0).ceil() as usize),
            max: constraints.max.map(|max| max.max(0.0).floor() as usize),
        }
    }
}

impl ValidationRule for LengthValidator {
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        let text = match value.as_str() {
            Some(text) => text,
            None => return Ok(()),
        };
        // Unicode-aware length
        let length = text.chars().count();

        if let Some(min) = self.min {
            if length < min {
                return Err(scope.error(ErrorType::MinString, Some(value)));
            }
        }

        if let Some(max) = self.max {
            if length > max {
                return Err(scope.error(ErrorType::MaxString, Some(value)));
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "length"
    }

    fn parameters(&self) -> Option<Value> {
        let mut params = serde_json::Map::new();

        if let Some(min) = self.min {
            params.insert("min".to_string(), Value::from(min));
        }
        if let Some(max) = self.max {
            params.insert("max".to_string(), Value::from(max));
        }

        if params.is_empty() {
            None
        } else {
            Some(Value::Object(params))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SchemaType;
    use serde_json::json;

    fn check(constraints: &Constraints, value: Value) -> Result<(), ValidationError> {
        let scope = FieldScope {
            name: "orderId",
            label: "Order ID",
            ty: &SchemaType::String,
            constraints,
        };
        LengthValidator::from_constraints(constraints).validate(&value, &scope)
    }

    #[test]
    fn test_length_validator_min_constraint() {
        let constraints = Constraints::new().min(1.0);

        assert!(check(&constraints, json!("213")).is_ok());
        assert!(check(&constraints, json!("0")).is_ok());

        let error = check(&constraints, json!("")).unwrap_err();
        assert_eq!(error.error_type, ErrorType::MinString);
        assert_eq!(error.message, "Order ID must be at least 1 characters");
    }

    #[test]
    fn test_length_validator_max_constraint() {
        let constraints = Constraints::new().max(5.0);

        assert!(check(&constraints, json!("hello")).is_ok());

        let error = check(&constraints, json!("hello world")).unwrap_err();
        assert_eq!(error.error_type, ErrorType::MaxString);
        assert_eq!(error.message, "Order ID cannot exceed 5 characters");
    }

    #[test]
    fn test_length_validator_counts_chars_not_bytes() {
        let constraints = Constraints::new().max(3.0);
        assert!(check(&constraints, json!("äöü")).is_ok());
    }

    #[test]
    fn test_length_validator_parameters() {
        let unbounded = LengthValidator::from_constraints(&Constraints::new());
        assert!(unbounded.parameters().is_none());
        let params = LengthValidator::from_constraints(&Constraints::new().min(2.0))
            .parameters()
            .unwrap();
        assert_eq!(params["min"], json!(2));
    }
}
