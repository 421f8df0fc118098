//! Evaluation contexts handed to `custom` and `auto_value` callbacks

use crate::definition::FieldDefinition;
use serde_json::Value;

/// Value found at a key path, as seen by callbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldValue<'a> {
    pub value: Option<&'a Value>,
    pub is_set: bool,
}

impl<'a> FieldValue<'a> {
    fn new(value: Option<&'a Value>) -> Self {
        Self {
            value,
            is_set: value.map_or(false, |v| !v.is_null()),
        }
    }
}

/// Context for a `custom` predicate.
///
/// `field` looks paths up from the root of the validated object,
/// `sibling_field` from the object that directly holds the current key.
#[derive(Debug, Clone, Copy)]
pub struct CustomContext<'a> {
    /// Concrete key path, e.g. `inventory.0.barcode`
    pub key: &'a str,
    /// Generic key path, e.g. `inventory.$.barcode`
    pub generic_key: &'a str,
    /// Current value; `None` when the key is absent
    pub value: Option<&'a Value>,
    pub definition: &'a FieldDefinition,
    root: &'a Value,
    parent: Option<&'a Value>,
}

impl<'a> CustomContext<'a> {
    pub(crate) fn new(
        key: &'a str,
        generic_key: &'a str,
        value: Option<&'a Value>,
        definition: &'a FieldDefinition,
        root: &'a Value,
        parent: Option<&'a Value>,
    ) -> Self {
        Self {
            key,
            generic_key,
            value,
            definition,
            root,
            parent,
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.map_or(false, |v| !v.is_null())
    }

    /// Look up a dotted path from the root object
    pub fn field(&self, path: &str) -> FieldValue<'a> {
        FieldValue::new(lookup(self.root, path))
    }

    /// Look up a key in the object holding the current key
    pub fn sibling_field(&self, name: &str) -> FieldValue<'a> {
        FieldValue::new(self.parent.and_then(|parent| lookup(parent, name)))
    }
}

/// Context for an `auto_value` callback
#[derive(Debug, Clone, Copy)]
pub struct AutoValueContext<'a> {
    pub key: &'a str,
    pub value: Option<&'a Value>,
    pub definition: &'a FieldDefinition,
    root: &'a Value,
    parent: Option<&'a Value>,
}

impl<'a> AutoValueContext<'a> {
    pub(crate) fn new(
        key: &'a str,
        value: Option<&'a Value>,
        definition: &'a FieldDefinition,
        root: &'a Value,
        parent: Option<&'a Value>,
    ) -> Self {
        Self {
            key,
            value,
            definition,
            root,
            parent,
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.map_or(false, |v| !v.is_null())
    }

    /// Look up a dotted path from the root object
    pub fn field(&self, path: &str) -> FieldValue<'a> {
        FieldValue::new(lookup(self.root, path))
    }

    /// Look up a key in the object holding the current key
    pub fn sibling_field(&self, name: &str) -> FieldValue<'a> {
        FieldValue::new(self.parent.and_then(|parent| lookup(parent, name)))
    }
}

/// Resolve a dotted path; numeric segments index into arrays
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
