//! Error types for schema registration and resolution

use simple_schema::SchemaError;
use thiserror::Error;

pub type DecoratorResult<T> = Result<T, DecoratorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecoratorError {
    #[error("Inheritance cycle while building schema for '{class}': {}", .chain.join(" -> "))]
    InheritanceCycle {
        class: &'static str,
        chain: Vec<&'static str>,
    },

    #[error("Nested schema cycle while resolving '{class}': {}", .chain.join(" -> "))]
    NestedCycle {
        class: &'static str,
        chain: Vec<&'static str>,
    },

    #[error("Field '{field}' of '{class}' has no type; declare it with `field::<T>()` or give an explicit type")]
    MissingType { class: &'static str, field: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
