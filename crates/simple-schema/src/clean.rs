//! Normalization of input values before validation

use crate::context::AutoValueContext;
use crate::definition::SchemaType;
use crate::schema::{member_key, CompiledField, SimpleSchema};
use crate::validators::TypeValidator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Which normalization steps `clean` performs. Everything is on by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanOptions {
    /// Drop keys the schema does not know
    pub filter: bool,
    /// Convert scalars to the declared type where it is lossless
    pub auto_convert: bool,
    /// Drop keys whose value is an empty string (after trimming)
    pub remove_empty_strings: bool,
    /// Trim strings unless the field sets `trim: false`
    pub trim_strings: bool,
    /// Run `auto_value` callbacks and apply `default_value`
    pub get_auto_values: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            filter: true,
            auto_convert: true,
            remove_empty_strings: true,
            trim_strings: true,
            get_auto_values: true,
        }
    }
}

/// Cleaned copy of `value`; non-objects are returned unchanged
pub fn clean(schema: &SimpleSchema, value: &Value, options: &CleanOptions) -> Value {
    match value {
        Value::Object(map) => {
            let cleaner = Cleaner {
                root: value,
                options,
            };
            Value::Object(cleaner.object(schema, map, ""))
        }
        other => other.clone(),
    }
}

struct Cleaner<'a> {
    root: &'a Value,
    options: &'a CleanOptions,
}

impl Cleaner<'_> {
    fn object(&self, schema: &SimpleSchema, input: &Map<String, Value>, prefix: &str) -> Map<String, Value> {
        let snapshot = Value::Object(input.clone());
        let mut output = Map::with_capacity(input.len());

        for (key, value) in input {
            if !schema.has_object_key(key) {
                if !self.options.filter {
                    output.insert(key.clone(), value.clone());
                }
                continue;
            }
            let name = join(prefix, key);
            let cleaned = self.value(schema, key, value.clone(), &name);
            if self.options.remove_empty_strings && cleaned.as_str() == Some("") {
                continue;
            }
            output.insert(key.clone(), cleaned);
        }

        if self.options.get_auto_values {
            for (key, field) in schema.object_keys() {
                self.auto_values(key, field, &join(prefix, key), &snapshot, &mut output);
            }
        }

        output
    }

    fn auto_values(
        &self,
        key: &str,
        field: &CompiledField,
        name: &str,
        snapshot: &Value,
        output: &mut Map<String, Value>,
    ) {
        let constraints = &field.definition.constraints;

        if let Some(auto_value) = &constraints.auto_value {
            let ctx = AutoValueContext::new(
                name,
                snapshot.get(key),
                &field.definition,
                self.root,
                Some(snapshot),
            );
            if let Some(value) = auto_value(&ctx) {
                output.insert(key.to_string(), value);
            }
        }

        if let Some(default) = &constraints.default_value {
            if !output.contains_key(key) {
                output.insert(key.to_string(), default.clone());
            }
        }
    }

    fn value(&self, schema: &SimpleSchema, local_key: &str, value: Value, name: &str) -> Value {
        let field = match schema.compiled(local_key) {
            Some(field) => field,
            None => return value,
        };
        let constraints = &field.definition.constraints;
        let ty = &field.definition.ty;

        let mut value = if self.options.auto_convert {
            convert(ty, value)
        } else {
            value
        };

        let trimmed = match &value {
            Value::String(text) if self.options.trim_strings && constraints.trim != Some(false) => {
                Some(text.trim().to_string()).filter(|trimmed| trimmed.len() != text.len())
            }
            _ => None,
        };
        if let Some(trimmed) = trimmed {
            value = Value::String(trimmed);
        }

        if constraints.is_blackbox() {
            return value;
        }

        match value {
            Value::Object(map) => match nested_schema(ty) {
                Some(nested) => Value::Object(self.object(nested, &map, name)),
                None => Value::Object(map),
            },
            Value::Array(items) if ty.alternatives().iter().any(|t| t.is_array()) => {
                let member = member_key(local_key);
                if schema.compiled(&member).is_none() {
                    return Value::Array(items);
                }
                Value::Array(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| {
                            self.value(schema, &member, item, &format!("{}.{}", name, index))
                        })
                        .collect(),
                )
            }
            other => other,
        }
    }
}

/// The nested schema object values of this type are checked against
fn nested_schema(ty: &SchemaType) -> Option<&SimpleSchema> {
    ty.alternatives().into_iter().find_map(|alternative| match alternative {
        SchemaType::Schema(nested) => Some(nested),
        _ => None,
    })
}

/// Convert `value` towards `ty` when the conversion is lossless
fn convert(ty: &SchemaType, value: Value) -> Value {
    match (ty, value) {
        (_, Value::Null) => Value::Null,
        (SchemaType::String, Value::Number(n)) => Value::String(n.to_string()),
        (SchemaType::String, Value::Bool(b)) => Value::String(b.to_string()),
        (SchemaType::Number | SchemaType::Integer, Value::String(text)) => {
            match parse_number(&text) {
                Some(number) => Value::Number(number),
                None => Value::String(text),
            }
        }
        (SchemaType::Boolean, Value::String(text)) => match text.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text),
        },
        (SchemaType::Array, value) if !value.is_array() => Value::Array(vec![value]),
        (SchemaType::OneOf(types), value) => {
            let alternatives = ty.alternatives();
            if alternatives
                .iter()
                .any(|alternative| TypeValidator::mismatch(alternative, &value).is_none())
            {
                return value;
            }
            for alternative in types {
                let converted = convert(alternative, value.clone());
                if TypeValidator::mismatch(alternative, &converted).is_none() {
                    return converted;
                }
            }
            value
        }
        (_, value) => value,
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    text.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
