//! # simple-schema
//!
//! Declarative constraint engine for JSON objects. A [`SchemaDefinition`]
//! maps keys to a type and a set of constraints; compiling it into a
//! [`SimpleSchema`] checks the description once, after which it can
//! validate (collecting every violation with a human-readable message) and
//! clean (convert, trim, filter, fill auto and default values) any number
//! of inputs.
//!
//! ```
//! use serde_json::json;
//! use simple_schema::{Constraints, FieldDefinition, SchemaDefinition, SchemaType, SimpleSchema, ValidationOptions};
//!
//! let schema = SimpleSchema::new(
//!     SchemaDefinition::new()
//!         .field("orderId", FieldDefinition::new(SchemaType::String).with(Constraints::new().min(1.0)))
//!         .field("index", SchemaType::Integer),
//! )
//! .unwrap();
//!
//! let validator = schema.validator(ValidationOptions::default());
//! let error = validator.validate(&json!({ "orderId": "", "index": 1 })).unwrap_err();
//! assert_eq!(error.to_string(), "Order ID must be at least 1 characters");
//! ```

pub mod clean;
pub mod context;
pub mod definition;
pub mod error;
pub mod label;
pub mod schema;
pub mod traits;
pub mod validator;
pub mod validators;

// Re-exports for easy access
pub use clean::CleanOptions;
pub use context::{AutoValueContext, CustomContext, FieldValue};
pub use definition::{
    AutoValueFn, Constraints, CustomFn, FieldDefinition, SchemaDefinition, SchemaType,
};
pub use error::{ErrorType, SchemaError, ValidationError, ValidationErrors, ValidationResult};
pub use label::humanize;
pub use schema::{member_key, SimpleSchema, MEMBER_KEY};
pub use traits::{FieldScope, ValidationRule};
pub use validator::{ValidationOptions, Validator};

// Built-in validators
pub use validators::{
    AllowedValuesValidator, CountValidator, CustomValidator, LengthValidator, NumericValidator,
    PatternValidator, RequiredValidator, TypeValidator,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_imports() {
        let schema = SimpleSchema::new(SchemaDefinition::new().field("name", SchemaType::String))
            .expect("schema compiles");
        let validator = schema.validator(ValidationOptions::default());

        assert!(validator.is_valid(&json!({ "name": "x" })));
        assert!(!validator.is_valid(&json!({})));
    }
}
