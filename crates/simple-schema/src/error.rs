//! Validation error types and handling

use crate::definition::{Constraints, SchemaType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Kind of constraint a value violated.
///
/// Serialized as the engine's string token (`"required"`, `"minCount"`, ...).
/// Tokens the engine does not know are kept as [`ErrorType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorType {
    Required,
    ExpectedType,
    MinString,
    MaxString,
    MinNumber,
    MaxNumber,
    MinNumberExclusive,
    MaxNumberExclusive,
    MinCount,
    MaxCount,
    NoDecimal,
    NotAllowed,
    FailedRegularExpression,
    KeyNotInSchema,
    Custom(String),
}

impl ErrorType {
    /// The string token for this error kind
    pub fn as_str(&self) -> &str {
        match self {
            ErrorType::Required => "required",
            ErrorType::ExpectedType => "expectedType",
            ErrorType::MinString => "minString",
            ErrorType::MaxString => "maxString",
            ErrorType::MinNumber => "minNumber",
            ErrorType::MaxNumber => "maxNumber",
            ErrorType::MinNumberExclusive => "minNumberExclusive",
            ErrorType::MaxNumberExclusive => "maxNumberExclusive",
            ErrorType::MinCount => "minCount",
            ErrorType::MaxCount => "maxCount",
            ErrorType::NoDecimal => "noDecimal",
            ErrorType::NotAllowed => "notAllowed",
            ErrorType::FailedRegularExpression => "regEx",
            ErrorType::KeyNotInSchema => "keyNotInSchema",
            ErrorType::Custom(token) => token,
        }
    }

    /// Default human-readable message for this kind.
    ///
    /// `name` is the full key path, `label` the field's display label; bounds
    /// are taken from the field's constraints.
    pub fn describe(
        &self,
        name: &str,
        label: &str,
        ty: &SchemaType,
        constraints: &Constraints,
        value: Option<&Value>,
    ) -> String {
        match self {
            ErrorType::Required => format!("{} is required", label),
            ErrorType::ExpectedType => format!("{} must be of type {}", label, ty.name()),
            ErrorType::MinString => {
                format!("{} must be at least {} characters", label, bound(constraints.min))
            }
            ErrorType::MaxString => {
                format!("{} cannot exceed {} characters", label, bound(constraints.max))
            }
            ErrorType::MinNumber => format!("{} must be at least {}", label, bound(constraints.min)),
            ErrorType::MaxNumber => format!("{} cannot exceed {}", label, bound(constraints.max)),
            ErrorType::MinNumberExclusive => {
                format!("{} must be greater than {}", label, bound(constraints.min))
            }
            ErrorType::MaxNumberExclusive => {
                format!("{} must be less than {}", label, bound(constraints.max))
            }
            ErrorType::MinCount => format!(
                "You must specify at least {} values",
                count(constraints.min_count)
            ),
            ErrorType::MaxCount => format!(
                "You cannot specify more than {} values",
                count(constraints.max_count)
            ),
            ErrorType::NoDecimal => format!("{} must be an integer", label),
            ErrorType::NotAllowed => format!(
                "{} is not an allowed value",
                value.map(display_value).unwrap_or_default()
            ),
            ErrorType::FailedRegularExpression => {
                format!("{} failed regular expression validation", label)
            }
            ErrorType::KeyNotInSchema => format!("{} is not allowed by the schema", name),
            ErrorType::Custom(_) => format!("{} is invalid", name),
        }
    }
}

impl From<String> for ErrorType {
    fn from(token: String) -> Self {
        match token.as_str() {
            "required" => ErrorType::Required,
            "expectedType" => ErrorType::ExpectedType,
            "minString" => ErrorType::MinString,
            "maxString" => ErrorType::MaxString,
            "minNumber" => ErrorType::MinNumber,
            "maxNumber" => ErrorType::MaxNumber,
            "minNumberExclusive" => ErrorType::MinNumberExclusive,
            "maxNumberExclusive" => ErrorType::MaxNumberExclusive,
            "minCount" => ErrorType::MinCount,
            "maxCount" => ErrorType::MaxCount,
            "noDecimal" => ErrorType::NoDecimal,
            "notAllowed" => ErrorType::NotAllowed,
            "regEx" => ErrorType::FailedRegularExpression,
            "keyNotInSchema" => ErrorType::KeyNotInSchema,
            _ => ErrorType::Custom(token),
        }
    }
}

impl From<&str> for ErrorType {
    fn from(token: &str) -> Self {
        ErrorType::from(token.to_string())
    }
}

impl From<ErrorType> for String {
    fn from(error_type: ErrorType) -> Self {
        match error_type {
            ErrorType::Custom(token) => token,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint violation at one key path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Full key path of the offending value, e.g. `inventory.0.barcode`
    pub name: String,
    /// The violated constraint
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    /// Offending value, if one was present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        name: impl Into<String>,
        error_type: impl Into<ErrorType>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            error_type: error_type.into(),
            value: None,
            message: message.into(),
        }
    }

    /// Attach the offending value
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every violation found while validating one input.
///
/// Displays as the first error's message, which is what callers usually
/// surface to users.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Error)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a single validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any validation errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of validation errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The headline error
    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Get errors for a specific key path
    pub fn get_field_errors(&self, name: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.name == name).collect()
    }

    /// Check if a specific key path has errors
    pub fn has_field_errors(&self, name: &str) -> bool {
        self.errors.iter().any(|e| e.name == name)
    }

    /// Check if any error is of the given kind
    pub fn has_error_type(&self, error_type: &ErrorType) -> bool {
        self.errors.iter().any(|e| &e.error_type == error_type)
    }

    /// Merge another ValidationErrors into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Create ValidationErrors from a single error
    pub fn from_error(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Convert to a JSON-serializable format for API responses
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": self.to_string(),
                "details": self.errors
            }
        })
    }

    pub(crate) fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.first() {
            Some(error) => f.write_str(&error.message),
            None => write!(f, "No validation errors"),
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}

/// Malformed schema description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Invalid schema key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Invalid definition for '{key}': no definition for parent key '{parent}'")]
    MissingParent { key: String, parent: String },

    #[error("Invalid definition for '{key}': '{parent}' is of type {parent_type}, member definitions require Array")]
    MembersWithoutArray {
        key: String,
        parent: String,
        parent_type: String,
    },

    #[error("Invalid definition for '{key}': a union type needs at least one alternative")]
    EmptyUnion { key: String },
}

impl SchemaError {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Render a number the way it was most likely written
pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Render a value for messages, strings without quotes
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bound(limit: Option<f64>) -> String {
    limit.map(format_number).unwrap_or_else(|| "?".to_string())
}

fn count(limit: Option<usize>) -> String {
    limit.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string())
}
