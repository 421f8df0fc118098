//! Built-in validators, one per constraint kind

pub mod allowed;
pub mod count;
pub mod custom;
pub mod length;
pub mod numeric;
pub mod pattern;
pub mod required;
pub mod types;

pub use allowed::AllowedValuesValidator;
pub use count::CountValidator;
pub use custom::CustomValidator;
pub use length::LengthValidator;
pub use numeric::NumericValidator;
pub use pattern::PatternValidator;
pub use required::RequiredValidator;
pub use types::TypeValidator;

use crate::definition::{Constraints, SchemaType};
use crate::traits::ValidationRule;
use std::sync::Arc;

/// Value-local rules for one (non-union) type, in evaluation order:
/// type, bounds, cardinality, pattern, allowed values.
pub fn rules_for(ty: &SchemaType, constraints: &Constraints) -> Vec<Arc<dyn ValidationRule>> {
    let mut rules: Vec<Arc<dyn ValidationRule>> = vec![Arc::new(TypeValidator::new(ty.clone()))];

    match ty {
        SchemaType::String => {
            if constraints.min.is_some() || constraints.max.is_some() {
                rules.push(Arc::new(LengthValidator::from_constraints(constraints)));
            }
            if let Some(ref regex) = constraints.reg_ex {
                rules.push(Arc::new(PatternValidator::from_regex(regex.clone())));
            }
        }
        SchemaType::Number | SchemaType::Integer => {
            if constraints.min.is_some() || constraints.max.is_some() {
                rules.push(Arc::new(NumericValidator::from_constraints(constraints)));
            }
        }
        SchemaType::Array => {
            if constraints.min_count.is_some() || constraints.max_count.is_some() {
                rules.push(Arc::new(CountValidator::from_constraints(constraints)));
            }
        }
        _ => {}
    }

    if let Some(ref values) = constraints.allowed_values {
        rules.push(Arc::new(AllowedValuesValidator::new(values.clone())));
    }

    rules
}
