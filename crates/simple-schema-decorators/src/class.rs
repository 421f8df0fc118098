//! Annotated types and the schema builder their annotations write into

use crate::annotations::{self, Annotation, FieldTarget, Members, ValidateOptions};
use crate::error::DecoratorResult;
use crate::field::{FieldType, SchemaRef, TypeDecl};
use crate::store::ClassSchema;
use regex::Regex;
use serde_json::Value;
use simple_schema::{AutoValueContext, CustomContext, ErrorType};

/// A type that carries a validation schema.
///
/// `annotate` runs once per process, the first time the type's schema is
/// needed, and registers the type's fields:
///
/// ```
/// use simple_schema_decorators::{Annotated, SchemaBuilder};
///
/// struct Order;
///
/// impl Annotated for Order {
///     fn annotate(schema: &mut SchemaBuilder) {
///         schema.field::<String>("orderId").min(1);
///         schema.field::<f64>("index").integer();
///     }
/// }
/// ```
pub trait Annotated: 'static {
    fn annotate(schema: &mut SchemaBuilder);

    /// Name used in logs and errors: the type name without module path or
    /// generic arguments
    fn class_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        path.rsplit("::").next().unwrap_or(path)
    }
}

/// Collects a type's annotations; turned into its [`ClassSchema`] afterwards
#[derive(Debug)]
pub struct SchemaBuilder {
    class: &'static str,
    parent: Option<SchemaRef>,
    fragments: Vec<(FieldTarget, Annotation)>,
}

impl SchemaBuilder {
    pub(crate) fn new(class: &'static str) -> Self {
        Self {
            class,
            parent: None,
            fragments: Vec::new(),
        }
    }

    /// Inherit every field of `P`; own annotations are applied on top
    pub fn extends<P: Annotated>(&mut self) -> &mut Self {
        self.parent = Some(SchemaRef::of::<P>());
        self
    }

    /// Annotate a field whose declared type is `T`
    pub fn field<T: FieldType>(&mut self, name: &str) -> FieldAnnotator<'_> {
        FieldAnnotator {
            builder: self,
            target: FieldTarget {
                name: name.to_string(),
                declared: Some(T::declared_type()),
            },
        }
    }

    /// Annotate a field without a declared type; an annotation must give
    /// the type explicitly
    pub fn property(&mut self, name: &str) -> FieldAnnotator<'_> {
        FieldAnnotator {
            builder: self,
            target: FieldTarget {
                name: name.to_string(),
                declared: None,
            },
        }
    }

    /// Apply annotation values to a field whose declared type is `T`
    pub fn annotate<T: FieldType>(
        &mut self,
        name: &str,
        annotations: impl IntoIterator<Item = Annotation>,
    ) -> &mut Self {
        let target = FieldTarget {
            name: name.to_string(),
            declared: Some(T::declared_type()),
        };
        for annotation in annotations {
            self.fragments.push((target.clone(), annotation));
        }
        self
    }

    pub(crate) fn build(self) -> DecoratorResult<ClassSchema> {
        let mut schema = match self.parent {
            Some(parent) => ClassSchema::derived(self.class, &*parent.ensure()?),
            None => ClassSchema::new(self.class),
        };

        for (target, annotation) in self.fragments {
            annotation.apply(&mut schema, &target);
        }
        schema.finalize();

        Ok(schema)
    }
}

/// Chaining annotations for one field
pub struct FieldAnnotator<'a> {
    builder: &'a mut SchemaBuilder,
    target: FieldTarget,
}

impl FieldAnnotator<'_> {
    /// Apply any annotation value
    pub fn with(self, annotation: Annotation) -> Self {
        self.builder
            .fragments
            .push((self.target.clone(), annotation));
        self
    }

    pub fn validate(self, options: ValidateOptions) -> Self {
        self.with(annotations::validate(options))
    }

    /// Register the field with its declared type and no constraints
    pub fn declare(self) -> Self {
        self.validate(ValidateOptions::new())
    }

    /// Explicit type, replacing the declared one
    pub fn ty(self, ty: impl Into<TypeDecl>) -> Self {
        self.validate(ValidateOptions::new().ty(ty))
    }

    /// What each member of this list field must satisfy
    pub fn members(self, members: Members) -> Self {
        self.validate(ValidateOptions::new().members(members))
    }

    pub fn one_of<I, D>(self, types: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TypeDecl>,
    {
        self.with(annotations::one_of(types))
    }

    pub fn integer(self) -> Self {
        self.with(annotations::integer())
    }

    pub fn min(self, min: impl Into<f64>) -> Self {
        self.with(annotations::min(min))
    }

    pub fn max(self, max: impl Into<f64>) -> Self {
        self.with(annotations::max(max))
    }

    pub fn exclusive_min(self) -> Self {
        self.with(annotations::exclusive_min())
    }

    pub fn exclusive_max(self) -> Self {
        self.with(annotations::exclusive_max())
    }

    pub fn min_count(self, count: usize) -> Self {
        self.with(annotations::min_count(count))
    }

    pub fn max_count(self, count: usize) -> Self {
        self.with(annotations::max_count(count))
    }

    pub fn allowed_values<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with(annotations::allowed_values(values))
    }

    pub fn constant(self, value: impl Into<Value>) -> Self {
        self.with(annotations::constant(value))
    }

    pub fn reg_ex(self, regex: Regex) -> Self {
        self.with(annotations::reg_ex(regex))
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.with(annotations::default_value(value))
    }

    pub fn optional(self) -> Self {
        self.with(annotations::optional())
    }

    pub fn custom<F>(self, predicate: F) -> Self
    where
        F: Fn(&CustomContext<'_>) -> Option<ErrorType> + Send + Sync + 'static,
    {
        self.with(annotations::custom(predicate))
    }

    pub fn auto_value<F>(self, derive: F) -> Self
    where
        F: Fn(&AutoValueContext<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        self.with(annotations::auto_value(derive))
    }

    pub fn blackbox(self) -> Self {
        self.with(annotations::blackbox())
    }

    pub fn trim(self, trim: bool) -> Self {
        self.with(annotations::trim(trim))
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.with(annotations::label(label))
    }
}
