//! Validators built from a compiled schema

use crate::clean::CleanOptions;
use crate::context::CustomContext;
use crate::definition::{Constraints, SchemaType};
use crate::error::{ErrorType, ValidationError, ValidationErrors, ValidationResult};
use crate::schema::{member_key, CompiledField, SimpleSchema, TypeCheck};
use crate::traits::FieldScope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for a validator, passed through untouched by callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Only validate these generic keys (`inventory.$.barcode`) and their
    /// descendants. `None` validates everything.
    pub keys: Option<Vec<String>>,
    /// Clean a copy of the input before validating it
    pub clean: bool,
    pub clean_options: CleanOptions,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn clean_options(mut self, clean_options: CleanOptions) -> Self {
        self.clean_options = clean_options;
        self
    }
}

/// Validates values against one schema with fixed options
#[derive(Debug, Clone)]
pub struct Validator {
    schema: SimpleSchema,
    options: ValidationOptions,
}

impl Validator {
    pub fn new(schema: SimpleSchema, options: ValidationOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &SimpleSchema {
        &self.schema
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate an object, collecting every violation.
    ///
    /// The returned errors display as the first violation's message.
    pub fn validate(&self, input: &Value) -> ValidationResult<()> {
        let cleaned;
        let input = if self.options.clean {
            cleaned = self.schema.clean(input, &self.options.clean_options);
            &cleaned
        } else {
            input
        };

        if !input.is_object() {
            return Err(ValidationError::new(
                "",
                ErrorType::ExpectedType,
                "Validated value must be an object",
            )
            .into());
        }

        let mut walk = Walk {
            root: input,
            filter: KeyFilter {
                keys: self.options.keys.as_deref(),
            },
            errors: ValidationErrors::new(),
        };
        walk.object(&self.schema, input, "", "");

        tracing::trace!(errors = walk.errors.len(), "validated value");
        walk.errors.into_result()
    }

    pub fn is_valid(&self, input: &Value) -> bool {
        self.validate(input).is_ok()
    }

    /// Turn the validator into a plain function
    pub fn into_fn(self) -> impl Fn(&Value) -> ValidationResult<()> + Send + Sync + 'static {
        move |input: &Value| self.validate(input)
    }
}

struct KeyFilter<'a> {
    keys: Option<&'a [String]>,
}

impl KeyFilter<'_> {
    /// Key is listed, or lies below a listed key
    fn selects(&self, generic: &str) -> bool {
        match self.keys {
            None => true,
            Some(keys) => keys.iter().any(|key| generic == key || is_below(generic, key)),
        }
    }

    /// A listed key lies below this key
    fn descends(&self, generic: &str) -> bool {
        match self.keys {
            None => true,
            Some(keys) => keys.iter().any(|key| is_below(key, generic)),
        }
    }
}

fn is_below(key: &str, ancestor: &str) -> bool {
    key.len() > ancestor.len() + 1
        && key.starts_with(ancestor)
        && key.as_bytes()[ancestor.len()] == b'.'
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

struct Walk<'a> {
    root: &'a Value,
    filter: KeyFilter<'a>,
    errors: ValidationErrors,
}

impl<'a> Walk<'a> {
    fn object(&mut self, schema: &SimpleSchema, object: &'a Value, name: &str, generic: &str) {
        let map = match object.as_object() {
            Some(map) => map,
            None => return,
        };

        for (key, _) in schema.object_keys() {
            self.key(
                schema,
                key,
                map.get(key),
                &join(name, key),
                &join(generic, key),
                Some(object),
            );
        }

        for (key, value) in map {
            if schema.has_object_key(key) || !self.filter.selects(&join(generic, key)) {
                continue;
            }
            let full_name = join(name, key);
            let message = ErrorType::KeyNotInSchema.describe(
                &full_name,
                key,
                &SchemaType::Any,
                &Constraints::default(),
                Some(value),
            );
            self.errors.add(
                ValidationError::new(full_name, ErrorType::KeyNotInSchema, message)
                    .with_value(value.clone()),
            );
        }
    }

    fn key(
        &mut self,
        schema: &SimpleSchema,
        local_key: &str,
        value: Option<&'a Value>,
        name: &str,
        generic: &str,
        parent: Option<&'a Value>,
    ) {
        let field = match schema.compiled(local_key) {
            Some(field) => field,
            None => return,
        };
        let selected = self.filter.selects(generic);
        if !selected && !self.filter.descends(generic) {
            return;
        }

        let scope = FieldScope {
            name,
            label: &field.label,
            ty: &field.definition.ty,
            constraints: &field.definition.constraints,
        };
        let mut valid = true;

        match value.filter(|v| !v.is_null()) {
            None => {
                if let Err(error) = field.required.check(value, &scope) {
                    valid = false;
                    if selected {
                        self.errors.add(error);
                    }
                }
            }
            Some(present) => match match_type(field, present, name) {
                Ok(check) => self.descend(schema, local_key, field, check, present, name, generic),
                Err(error) => {
                    valid = false;
                    if selected {
                        self.errors.add(error);
                    }
                }
            },
        }

        if !(selected && valid) {
            return;
        }
        if let Some(custom) = &field.custom {
            let ctx = CustomContext::new(name, generic, value, &field.definition, self.root, parent);
            if let Err(error) = custom.check(&ctx, &scope) {
                self.errors.add(error);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn descend(
        &mut self,
        schema: &SimpleSchema,
        local_key: &str,
        field: &CompiledField,
        check: &TypeCheck,
        value: &'a Value,
        name: &str,
        generic: &str,
    ) {
        if field.definition.constraints.is_blackbox() {
            return;
        }

        match (&check.ty, value) {
            (SchemaType::Schema(nested), Value::Object(_)) => self.object(nested, value, name, generic),
            (SchemaType::Array, Value::Array(items)) => {
                let member = member_key(local_key);
                if schema.compiled(&member).is_none() {
                    return;
                }
                let member_generic = member_key(generic);
                for (index, item) in items.iter().enumerate() {
                    self.key(
                        schema,
                        &member,
                        Some(item),
                        &format!("{}.{}", name, index),
                        &member_generic,
                        Some(value),
                    );
                }
            }
            _ => {}
        }
    }
}

/// First type alternative whose rules all pass; otherwise the first
/// alternative's error
fn match_type<'f>(
    field: &'f CompiledField,
    value: &Value,
    name: &str,
) -> Result<&'f TypeCheck, ValidationError> {
    let mut first_error = None;

    for check in &field.checks {
        let scope = FieldScope {
            name,
            label: &field.label,
            ty: &check.ty,
            constraints: &field.definition.constraints,
        };
        match check.rules.iter().try_for_each(|rule| rule.validate(value, &scope)) {
            Ok(()) => return Ok(check),
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }

    Err(first_error.unwrap_or_else(|| {
        let scope = FieldScope {
            name,
            label: &field.label,
            ty: &field.definition.ty,
            constraints: &field.definition.constraints,
        };
        scope.error(ErrorType::ExpectedType, Some(value))
    }))
}
