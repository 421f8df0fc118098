//! Pattern-based validator using regular expressions

use crate::error::{ErrorType, ValidationError};
use crate::traits::{FieldScope, ValidationRule};
use regex::Regex;
use serde_json::Value;

/// Validator for regular expression patterns.
///
/// Matches anywhere in the string; anchor the pattern (`^...$`) to require
/// the whole value to match.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    /// The regular expression pattern
    pattern: Regex,
}

impl PatternValidator {
    /// Create a new pattern validator
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    /// Create a validator from an existing Regex
    pub fn from_regex(regex: Regex) -> Self {
        Self { pattern: regex }
    }

    /// Get the pattern string
    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }
}

impl ValidationRule for PatternValidator {
    fn validate(&self, value: &Value, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        let text = match value.as_str() {
            Some(text) => text,
            None => return Ok(()),
        };

        if self.pattern.is_match(text) {
            Ok(())
        } else {
            Err(scope.error(ErrorType::FailedRegularExpression, Some(value)))
        }
    }

    fn rule_name(&self) -> &'static str {
        "pattern"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({ "pattern": self.pattern.as_str() }))
    }
}
