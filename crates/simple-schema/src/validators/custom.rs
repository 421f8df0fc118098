//! User-supplied predicates

use crate::context::CustomContext;
use crate::definition::CustomFn;
use crate::error::ValidationError;
use crate::traits::FieldScope;

/// Runs a field's `custom` predicate and turns its verdict into an error.
///
/// Unlike the value rules it sees absent values too, so a predicate can
/// make an optional key conditionally required.
#[derive(Clone)]
pub struct CustomValidator {
    /// Key the predicate belongs to
    pub name: String,
    func: CustomFn,
}

impl CustomValidator {
    pub fn new(name: impl Into<String>, func: CustomFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    /// Get the validator name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, ctx: &CustomContext<'_>, scope: &FieldScope<'_>) -> Result<(), ValidationError> {
        match (self.func)(ctx) {
            None => Ok(()),
            Some(error_type) => Err(scope.error(error_type, ctx.value)),
        }
    }

    pub fn rule_name(&self) -> &'static str {
        "custom"
    }
}

impl std::fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
