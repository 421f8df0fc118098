//! Field annotations
//!
//! Every annotation is a value contributing one fragment of constraint data to
//! one field. Factories here build them; [`SchemaBuilder::annotate`] and the
//! chaining [`FieldAnnotator`] apply them.
//!
//! [`SchemaBuilder::annotate`]: crate::SchemaBuilder::annotate
//! [`FieldAnnotator`]: crate::FieldAnnotator

use crate::class::Annotated;
use crate::field::{DeclaredType, SchemaRef, TypeDecl};
use crate::store::{ClassSchema, FieldConstraintSet, TypeSlot};
use regex::Regex;
use serde_json::Value;
use simple_schema::{AutoValueContext, Constraints, CustomContext, ErrorType, SchemaType};

/// What each member of a list field must satisfy
#[derive(Debug, Clone)]
pub enum Members {
    /// A primitive member type with its own constraints
    Field { ty: TypeDecl, constraints: Constraints },
    /// Members are objects of an annotated type
    Class(SchemaRef),
}

impl Members {
    pub fn field(ty: impl Into<TypeDecl>, constraints: Constraints) -> Self {
        Members::Field {
            ty: ty.into(),
            constraints,
        }
    }

    pub fn class<T: Annotated>() -> Self {
        Members::Class(SchemaRef::of::<T>())
    }

    pub(crate) fn into_entry(self) -> FieldConstraintSet {
        match self {
            Members::Field { ty, constraints } => FieldConstraintSet {
                ty: Some(TypeSlot::explicit(ty)),
                constraints,
                ..FieldConstraintSet::default()
            },
            Members::Class(class) => FieldConstraintSet {
                ty: Some(TypeSlot::explicit(TypeDecl::Class(class))),
                ..FieldConstraintSet::default()
            },
        }
    }
}

/// Arguments of [`validate`]
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    pub members: Option<Members>,
    /// Explicit type; wins over the declared type
    pub ty: Option<TypeDecl>,
    pub constraints: Constraints,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(mut self, members: Members) -> Self {
        self.members = Some(members);
        self
    }

    pub fn ty(mut self, ty: impl Into<TypeDecl>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// One fragment of constraint data for one field
#[derive(Debug, Clone)]
pub enum Annotation {
    Validate(ValidateOptions),
    OneOf(Vec<TypeDecl>),
}

/// Field an annotation is applied to
#[derive(Debug, Clone)]
pub(crate) struct FieldTarget {
    pub(crate) name: String,
    pub(crate) declared: Option<DeclaredType>,
}

impl Annotation {
    pub(crate) fn apply(self, schema: &mut ClassSchema, target: &FieldTarget) {
        let entry = schema.entry(&target.name);

        match self {
            Annotation::Validate(options) => {
                entry.constraints.overlay(options.constraints);

                match options.ty {
                    Some(ty) => entry.ty = Some(TypeSlot::explicit(ty)),
                    None => {
                        let inferred_may_write = entry.ty.as_ref().map_or(true, |slot| !slot.explicit);
                        if let (true, Some(declared)) = (inferred_may_write, &target.declared) {
                            entry.ty = Some(TypeSlot::inferred(declared.ty.clone()));
                        }
                    }
                }

                if let Some(member) = target.declared.as_ref().and_then(|d| d.member.as_deref()) {
                    entry.declared_member = Some(member.clone());
                }
                if options.members.is_some() {
                    entry.members = options.members;
                }
            }
            Annotation::OneOf(types) => {
                entry.ty = Some(TypeSlot::explicit(TypeDecl::OneOf(types)));
            }
        }
    }
}

/// Type marker plus constraints, members and explicit type
pub fn validate(options: ValidateOptions) -> Annotation {
    Annotation::Validate(options)
}

fn constraint(constraints: Constraints) -> Annotation {
    validate(ValidateOptions::new().constraints(constraints))
}

/// Union of types; replaces any other type of the field
pub fn one_of<I, D>(types: I) -> Annotation
where
    I: IntoIterator<Item = D>,
    D: Into<TypeDecl>,
{
    Annotation::OneOf(types.into_iter().map(Into::into).collect())
}

/// Integer numbers only
pub fn integer() -> Annotation {
    validate(ValidateOptions::new().ty(SchemaType::Integer))
}

/// Minimum value, or minimum length for strings
pub fn min(min: impl Into<f64>) -> Annotation {
    constraint(Constraints::new().min(min.into()))
}

/// Maximum value, or maximum length for strings
pub fn max(max: impl Into<f64>) -> Annotation {
    constraint(Constraints::new().max(max.into()))
}

pub fn exclusive_min() -> Annotation {
    constraint(Constraints::new().exclusive_min(true))
}

pub fn exclusive_max() -> Annotation {
    constraint(Constraints::new().exclusive_max(true))
}

pub fn min_count(count: usize) -> Annotation {
    constraint(Constraints::new().min_count(count))
}

pub fn max_count(count: usize) -> Annotation {
    constraint(Constraints::new().max_count(count))
}

pub fn allowed_values<I, V>(values: I) -> Annotation
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    constraint(Constraints::new().allowed_values(values.into_iter().map(Into::into)))
}

/// Exactly this value
pub fn constant(value: impl Into<Value>) -> Annotation {
    allowed_values([value.into()])
}

pub fn reg_ex(regex: Regex) -> Annotation {
    constraint(Constraints::new().reg_ex(regex))
}

/// Value filled in by cleaning when the key is absent
pub fn default_value(value: impl Into<Value>) -> Annotation {
    constraint(Constraints::new().default_value(value.into()))
}

pub fn optional() -> Annotation {
    constraint(Constraints::new().optional(true))
}

/// Predicate run with the engine's validation context.
///
/// Return `None` when valid, otherwise the error kind (an [`ErrorType`] or
/// any free-form reason).
pub fn custom<F>(predicate: F) -> Annotation
where
    F: Fn(&CustomContext<'_>) -> Option<ErrorType> + Send + Sync + 'static,
{
    constraint(Constraints::new().custom(predicate))
}

/// Derivation run while cleaning; `Some(value)` replaces the field value
pub fn auto_value<F>(derive: F) -> Annotation
where
    F: Fn(&AutoValueContext<'_>) -> Option<Value> + Send + Sync + 'static,
{
    constraint(Constraints::new().auto_value(derive))
}

/// Skip checking the contents of an object field
pub fn blackbox() -> Annotation {
    constraint(Constraints::new().blackbox(true))
}

pub fn trim(trim: bool) -> Annotation {
    constraint(Constraints::new().trim(trim))
}

/// Label used in error messages instead of the humanized key
pub fn label(label: impl Into<String>) -> Annotation {
    constraint(Constraints::new().label(label))
}
