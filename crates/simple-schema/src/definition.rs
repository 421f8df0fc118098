//! Schema descriptions: field types, constraint sets and the key → definition map

use crate::context::{AutoValueContext, CustomContext};
use crate::error::ErrorType;
use crate::schema::SimpleSchema;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Custom predicate. `None` means valid, `Some(kind)` fails with that kind
/// (a known engine token or any free-form reason).
pub type CustomFn = Arc<dyn Fn(&CustomContext<'_>) -> Option<ErrorType> + Send + Sync>;

/// Derivation function run while cleaning. `Some(value)` replaces the field value.
pub type AutoValueFn = Arc<dyn Fn(&AutoValueContext<'_>) -> Option<Value> + Send + Sync>;

/// Type of a schema field
#[derive(Debug, Clone)]
pub enum SchemaType {
    String,
    Number,
    /// Number without a fractional part
    Integer,
    Boolean,
    /// List; members are described by the `<key>.$` entry
    Array,
    /// Unstructured object, contents are not checked
    Object,
    /// Any value is accepted
    Any,
    /// Object validated against a nested schema
    Schema(SimpleSchema),
    /// Value must satisfy at least one alternative
    OneOf(Vec<SchemaType>),
}

impl SchemaType {
    /// Union of the given alternatives
    pub fn one_of(types: impl IntoIterator<Item = SchemaType>) -> Self {
        SchemaType::OneOf(types.into_iter().collect())
    }

    /// Name used in type mismatch messages
    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::String => "String",
            SchemaType::Number => "Number",
            SchemaType::Integer => "Integer",
            SchemaType::Boolean => "Boolean",
            SchemaType::Array => "Array",
            SchemaType::Object | SchemaType::Schema(_) => "Object",
            SchemaType::Any => "Any",
            SchemaType::OneOf(types) => types.first().map_or("Any", SchemaType::name),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SchemaType::Array)
    }

    /// Alternatives of a union flattened, or the type itself
    pub fn alternatives(&self) -> Vec<&SchemaType> {
        match self {
            SchemaType::OneOf(types) => types.iter().flat_map(SchemaType::alternatives).collect(),
            other => vec![other],
        }
    }
}

impl PartialEq for SchemaType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SchemaType::Schema(a), SchemaType::Schema(b)) => a.ptr_eq(b),
            (SchemaType::OneOf(a), SchemaType::OneOf(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// Every constraint kind a field can carry, except its type.
///
/// Each kind is independent: setting one never touches another, and
/// [`Constraints::overlay`] replaces kind by kind.
#[derive(Clone, Default)]
pub struct Constraints {
    pub optional: Option<bool>,
    /// Numeric minimum, or minimum length for strings
    pub min: Option<f64>,
    /// Numeric maximum, or maximum length for strings
    pub max: Option<f64>,
    pub exclusive_min: Option<bool>,
    pub exclusive_max: Option<bool>,
    pub min_count: Option<usize>,
    pub max_count: Option<usize>,
    pub allowed_values: Option<Vec<Value>>,
    pub reg_ex: Option<Regex>,
    pub custom: Option<CustomFn>,
    pub auto_value: Option<AutoValueFn>,
    pub default_value: Option<Value>,
    pub blackbox: Option<bool>,
    pub trim: Option<bool>,
    pub label: Option<String>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn exclusive_min(mut self, exclusive: bool) -> Self {
        self.exclusive_min = Some(exclusive);
        self
    }

    pub fn exclusive_max(mut self, exclusive: bool) -> Self {
        self.exclusive_max = Some(exclusive);
        self
    }

    pub fn min_count(mut self, count: usize) -> Self {
        self.min_count = Some(count);
        self
    }

    pub fn max_count(mut self, count: usize) -> Self {
        self.max_count = Some(count);
        self
    }

    pub fn allowed_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed_values = Some(values.into_iter().collect());
        self
    }

    pub fn reg_ex(mut self, regex: Regex) -> Self {
        self.reg_ex = Some(regex);
        self
    }

    pub fn custom<F>(mut self, custom: F) -> Self
    where
        F: Fn(&CustomContext<'_>) -> Option<ErrorType> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(custom));
        self
    }

    pub fn auto_value<F>(mut self, auto_value: F) -> Self
    where
        F: Fn(&AutoValueContext<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        self.auto_value = Some(Arc::new(auto_value));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn blackbox(mut self, blackbox: bool) -> Self {
        self.blackbox = Some(blackbox);
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }

    pub fn is_blackbox(&self) -> bool {
        self.blackbox.unwrap_or(false)
    }

    /// Overwrite every kind that `other` sets; kinds `other` leaves unset keep
    /// their current value.
    pub fn overlay(&mut self, other: Constraints) {
        macro_rules! take {
            ($($kind:ident),*) => {
                $(if other.$kind.is_some() { self.$kind = other.$kind; })*
            };
        }
        take!(
            optional,
            min,
            max,
            exclusive_min,
            exclusive_max,
            min_count,
            max_count,
            allowed_values,
            reg_ex,
            custom,
            auto_value,
            default_value,
            blackbox,
            trim,
            label
        );
    }
}

impl fmt::Debug for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("optional", &self.optional)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("exclusive_min", &self.exclusive_min)
            .field("exclusive_max", &self.exclusive_max)
            .field("min_count", &self.min_count)
            .field("max_count", &self.max_count)
            .field("allowed_values", &self.allowed_values)
            .field("reg_ex", &self.reg_ex.as_ref().map(Regex::as_str))
            .field("has_custom", &self.custom.is_some())
            .field("has_auto_value", &self.auto_value.is_some())
            .field("default_value", &self.default_value)
            .field("blackbox", &self.blackbox)
            .field("trim", &self.trim)
            .field("label", &self.label)
            .finish()
    }
}

/// Type plus constraints for one schema key
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub ty: SchemaType,
    pub constraints: Constraints,
}

impl FieldDefinition {
    pub fn new(ty: SchemaType) -> Self {
        Self {
            ty,
            constraints: Constraints::default(),
        }
    }

    /// Replace the constraint set
    pub fn with(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

impl From<SchemaType> for FieldDefinition {
    fn from(ty: SchemaType) -> Self {
        FieldDefinition::new(ty)
    }
}

/// Ordered map from schema key to field definition.
///
/// Keys are plain field names, or `<field>.$` for the members of a list
/// field. Insertion order decides the order in which errors are reported.
#[derive(Debug, Clone, Default)]
pub struct SchemaDefinition {
    fields: IndexMap<String, FieldDefinition>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn field(mut self, key: impl Into<String>, definition: impl Into<FieldDefinition>) -> Self {
        self.insert(key, definition);
        self
    }

    /// Insert or replace a key's definition
    pub fn insert(&mut self, key: impl Into<String>, definition: impl Into<FieldDefinition>) {
        self.fields.insert(key.into(), definition.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDefinition)> for SchemaDefinition {
    fn from_iter<I: IntoIterator<Item = (K, FieldDefinition)>>(iter: I) -> Self {
        let mut definition = SchemaDefinition::new();
        for (key, field) in iter {
            definition.insert(key, field);
        }
        definition
    }
}

impl IntoIterator for SchemaDefinition {
    type Item = (String, FieldDefinition);
    type IntoIter = indexmap::map::IntoIter<String, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
