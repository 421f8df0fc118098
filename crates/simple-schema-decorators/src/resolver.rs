//! Turning class schemas into engine schemas and validators

use crate::class::Annotated;
use crate::error::{DecoratorError, DecoratorResult};
use crate::field::{DeclaredType, SchemaRef, TypeDecl};
use crate::store::ClassSchema;
use simple_schema::{
    member_key, FieldDefinition, SchemaDefinition, SchemaType, SimpleSchema, ValidationOptions,
    Validator,
};

/// Engine schema for `T`, nested classes resolved recursively.
///
/// Built fresh on every call from the stored class schema.
pub fn get_schema<T: Annotated>() -> DecoratorResult<SimpleSchema> {
    resolve(SchemaRef::of::<T>(), &mut Vec::new())
}

/// Validator for `T`; `options` are handed to the engine untouched
pub fn get_validator<T: Annotated>(options: ValidationOptions) -> DecoratorResult<Validator> {
    Ok(get_schema::<T>()?.validator(options))
}

/// Same as [`get_schema`], for the type of `instance`
pub fn schema_of<T: Annotated>(_instance: &T) -> DecoratorResult<SimpleSchema> {
    get_schema::<T>()
}

/// Same as [`get_validator`], for the type of `instance`
pub fn validator_of<T: Annotated>(
    _instance: &T,
    options: ValidationOptions,
) -> DecoratorResult<Validator> {
    get_validator::<T>(options)
}

/// Engine description of a class schema, without compiling it
pub fn describe<T: Annotated>() -> DecoratorResult<SchemaDefinition> {
    let class = SchemaRef::of::<T>();
    let mut stack = vec![class];
    describe_class(&*class.ensure()?, &mut stack)
}

fn resolve(class: SchemaRef, stack: &mut Vec<SchemaRef>) -> DecoratorResult<SimpleSchema> {
    if stack.contains(&class) {
        let mut chain: Vec<&'static str> = stack.iter().map(SchemaRef::name).collect();
        chain.push(class.name());
        return Err(DecoratorError::NestedCycle {
            class: class.name(),
            chain,
        });
    }

    let class_schema = class.ensure()?;
    stack.push(class);
    let definition = describe_class(&class_schema, stack);
    stack.pop();

    let definition = definition?;
    tracing::debug!(class = class.name(), keys = definition.len(), "resolved schema");
    Ok(SimpleSchema::new(definition)?)
}

fn describe_class(
    schema: &ClassSchema,
    stack: &mut Vec<SchemaRef>,
) -> DecoratorResult<SchemaDefinition> {
    let mut definition = SchemaDefinition::new();

    for (key, field) in schema.fields() {
        let slot = field.ty.as_ref().ok_or_else(|| DecoratorError::MissingType {
            class: schema.name(),
            field: key.to_string(),
        })?;
        let ty = resolve_type(&slot.decl, stack)?;

        definition.insert(key, FieldDefinition::new(ty.clone()).with(field.constraints.clone()));

        if let Some(member) = &field.declared_member {
            synthesize_members(schema, &mut definition, key, &ty, member, stack)?;
        }
    }

    Ok(definition)
}

/// Member entries for lists whose declared Rust type names the element type,
/// unless the class declares the member entry itself
fn synthesize_members(
    schema: &ClassSchema,
    definition: &mut SchemaDefinition,
    key: &str,
    ty: &SchemaType,
    member: &DeclaredType,
    stack: &mut Vec<SchemaRef>,
) -> DecoratorResult<()> {
    if !ty.alternatives().iter().any(|t| t.is_array()) {
        return Ok(());
    }
    let member_key = member_key(key);
    if schema.contains_key(&member_key) {
        return Ok(());
    }

    let member_ty = resolve_type(&member.ty, stack)?;
    definition.insert(member_key.clone(), FieldDefinition::new(member_ty.clone()));

    match &member.member {
        Some(inner) => synthesize_members(schema, definition, &member_key, &member_ty, inner, stack),
        None => Ok(()),
    }
}

fn resolve_type(decl: &TypeDecl, stack: &mut Vec<SchemaRef>) -> DecoratorResult<SchemaType> {
    match decl {
        TypeDecl::Known(ty) => Ok(ty.clone()),
        TypeDecl::Class(class) => Ok(SchemaType::Schema(resolve(*class, stack)?)),
        TypeDecl::OneOf(types) => {
            let alternatives = types
                .iter()
                .map(|alternative| resolve_type(alternative, stack))
                .collect::<DecoratorResult<Vec<_>>>()?;
            Ok(SchemaType::OneOf(alternatives))
        }
    }
}
