//! Compiled schemas

use crate::clean::{self, CleanOptions};
use crate::definition::{FieldDefinition, SchemaDefinition, SchemaType};
use crate::error::{SchemaError, ValidationResult};
use crate::label::label_for_key;
use crate::traits::ValidationRule;
use crate::validator::{ValidationOptions, Validator};
use crate::validators::{rules_for, CustomValidator, RequiredValidator};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Member marker segment in schema keys
pub const MEMBER_KEY: &str = "$";

/// A checked schema description, ready to validate and clean values.
///
/// Cheap to clone; clones share the compiled rules.
#[derive(Clone)]
pub struct SimpleSchema {
    inner: Arc<SchemaInner>,
}

struct SchemaInner {
    definition: SchemaDefinition,
    fields: IndexMap<String, CompiledField>,
}

/// Value-local rules for one alternative of a field's type
pub(crate) struct TypeCheck {
    pub(crate) ty: SchemaType,
    pub(crate) rules: Vec<Arc<dyn ValidationRule>>,
}

pub(crate) struct CompiledField {
    pub(crate) definition: FieldDefinition,
    pub(crate) label: String,
    pub(crate) required: RequiredValidator,
    /// One entry per union alternative, a single entry otherwise
    pub(crate) checks: Vec<TypeCheck>,
    pub(crate) custom: Option<CustomValidator>,
}

impl SimpleSchema {
    /// Check and compile a schema description.
    ///
    /// Keys are plain names or `<key>.$` member keys. A member key needs a
    /// parent key of type Array; any other dotted key is rejected.
    pub fn new(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let mut fields = IndexMap::with_capacity(definition.len());

        for (key, field) in definition.iter() {
            check_key(&definition, key)?;
            check_type(key, &field.ty)?;
            fields.insert(key.to_string(), compile_field(key, field));
        }

        tracing::debug!(
            fields = fields.len(),
            keys = ?definition.keys().collect::<Vec<_>>(),
            "compiled schema"
        );

        Ok(Self {
            inner: Arc::new(SchemaInner { definition, fields }),
        })
    }

    /// The description this schema was built from
    pub fn definition(&self) -> &SchemaDefinition {
        &self.inner.definition
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.fields.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.inner.fields.get(key).map(|field| &field.definition)
    }

    /// Display label of a key, explicit or derived from the key
    pub fn label(&self, key: &str) -> Option<&str> {
        self.inner.fields.get(key).map(|field| field.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Whether both handles share one compiled schema
    pub fn ptr_eq(&self, other: &SimpleSchema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Build a validator; options are kept as given
    pub fn validator(&self, options: ValidationOptions) -> Validator {
        Validator::new(self.clone(), options)
    }

    /// One-off validation
    pub fn validate(&self, input: &Value, options: &ValidationOptions) -> ValidationResult<()> {
        self.validator(options.clone()).validate(input)
    }

    /// Normalized copy of `value`
    pub fn clean(&self, value: &Value, options: &CleanOptions) -> Value {
        clean::clean(self, value, options)
    }

    pub(crate) fn compiled(&self, key: &str) -> Option<&CompiledField> {
        self.inner.fields.get(key)
    }

    /// Top-level keys, in declaration order
    pub(crate) fn object_keys(&self) -> impl Iterator<Item = (&str, &CompiledField)> {
        self.inner
            .fields
            .iter()
            .filter(|(key, _)| !key.contains('.'))
            .map(|(key, field)| (key.as_str(), field))
    }

    pub(crate) fn has_object_key(&self, key: &str) -> bool {
        !key.contains('.') && self.inner.fields.contains_key(key)
    }
}

impl fmt::Debug for SimpleSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleSchema")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Key of the member entry for `key`
pub fn member_key(key: &str) -> String {
    format!("{}.{}", key, MEMBER_KEY)
}

fn check_key(definition: &SchemaDefinition, key: &str) -> Result<(), SchemaError> {
    let mut segments = key.split('.');
    match segments.next() {
        Some(first) if !first.is_empty() && first != MEMBER_KEY => {}
        _ => return Err(SchemaError::invalid_key(key, "key must start with a field name")),
    }
    if segments.any(|segment| segment != MEMBER_KEY) {
        return Err(SchemaError::invalid_key(
            key,
            "dotted keys are only allowed for list members (`<key>.$`); use a nested schema instead",
        ));
    }

    let parent = match key.strip_suffix(".$") {
        Some(parent) => parent,
        None => return Ok(()),
    };
    let parent_field = definition
        .get(parent)
        .ok_or_else(|| SchemaError::MissingParent {
            key: key.to_string(),
            parent: parent.to_string(),
        })?;
    if !parent_field.ty.alternatives().iter().any(|ty| ty.is_array()) {
        return Err(SchemaError::MembersWithoutArray {
            key: key.to_string(),
            parent: parent.to_string(),
            parent_type: parent_field.ty.name().to_string(),
        });
    }
    Ok(())
}

fn check_type(key: &str, ty: &SchemaType) -> Result<(), SchemaError> {
    if let SchemaType::OneOf(types) = ty {
        if types.is_empty() {
            return Err(SchemaError::EmptyUnion {
                key: key.to_string(),
            });
        }
        for alternative in types {
            check_type(key, alternative)?;
        }
    }
    Ok(())
}

fn compile_field(key: &str, definition: &FieldDefinition) -> CompiledField {
    let constraints = &definition.constraints;
    let checks = definition
        .ty
        .alternatives()
        .into_iter()
        .map(|ty| TypeCheck {
            ty: ty.clone(),
            rules: rules_for(ty, constraints),
        })
        .collect();

    CompiledField {
        definition: definition.clone(),
        label: constraints
            .label
            .clone()
            .unwrap_or_else(|| label_for_key(key)),
        required: RequiredValidator::new(),
        checks,
        custom: constraints
            .custom
            .clone()
            .map(|func| CustomValidator::new(key, func)),
    }
}
