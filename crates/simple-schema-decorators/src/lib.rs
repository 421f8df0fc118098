//! # simple-schema-decorators
//!
//! Validation schemas declared next to the Rust types they describe. A type
//! implements [`Annotated`] and registers its fields with lightweight
//! annotations (type, bounds, cardinality, allowed values, patterns, custom
//! predicates, default and constant values, unions); the first time the
//! type's schema is needed the annotations are accumulated into a
//! [`ClassSchema`], merged with the parent type's schema if it
//! [`extends`](SchemaBuilder::extends) one. [`get_validator`] resolves nested
//! types and list members and hands the result to the `simple-schema` engine.
//!
//! ```
//! use serde_json::json;
//! use simple_schema_decorators::{get_validator, Annotated, SchemaBuilder, ValidationOptions};
//!
//! struct NumberDto;
//!
//! impl Annotated for NumberDto {
//!     fn annotate(schema: &mut SchemaBuilder) {
//!         schema.field::<f64>("number").min(5).max(10);
//!     }
//! }
//!
//! let validator = get_validator::<NumberDto>(ValidationOptions::default()).unwrap();
//! assert!(validator.validate(&json!({ "number": 6 })).is_ok());
//!
//! let error = validator.validate(&json!({ "number": 11 })).unwrap_err();
//! assert_eq!(error.to_string(), "Number cannot exceed 10");
//! ```

pub mod annotations;
pub mod class;
pub mod error;
pub mod field;
pub mod resolver;
pub mod store;

// Re-exports for easy access
pub use annotations::{Annotation, Members, ValidateOptions};
pub use class::{Annotated, FieldAnnotator, SchemaBuilder};
pub use error::{DecoratorError, DecoratorResult};
pub use field::{DeclaredType, FieldType, SchemaRef, TypeDecl};
pub use resolver::{describe, get_schema, get_validator, schema_of, validator_of};
pub use store::{ensure_schema, ClassSchema, FieldConstraintSet, SchemaStore, TypeSlot, SCHEMA_STORE};

// Engine types used alongside annotations
pub use simple_schema;
pub use simple_schema::{
    AutoValueContext, CleanOptions, Constraints, CustomContext, ErrorType, SchemaType,
    SimpleSchema, ValidationErrors, ValidationOptions, Validator,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Vegetable;

    impl Annotated for Vegetable {
        fn annotate(schema: &mut SchemaBuilder) {
            schema.annotate::<String>(
                "vegetable",
                [annotations::custom(|ctx| {
                    if ctx.value == Some(&json!("potato")) {
                        None
                    } else {
                        Some("should be potato".into())
                    }
                })],
            );
        }
    }

    #[test]
    fn test_decorator_imports() {
        let validator = get_validator::<Vegetable>(ValidationOptions::default()).unwrap();

        assert!(validator.is_valid(&json!({ "vegetable": "potato" })));
        assert_eq!(
            validator
                .validate(&json!({ "vegetable": "carrot" }))
                .unwrap_err()
                .to_string(),
            "vegetable is invalid"
        );
    }
}
