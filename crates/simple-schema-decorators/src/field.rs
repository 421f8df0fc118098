//! Field types as annotations see them
//!
//! A field's declared type comes from the Rust type it is registered with
//! (`schema.field::<Vec<InventoryItem>>("inventory")`), through the
//! [`FieldType`] trait. Nested classes stay symbolic ([`SchemaRef`]) until the
//! resolver turns them into nested schemas.

use crate::class::Annotated;
use crate::error::DecoratorResult;
use crate::store::{self, ClassSchema};
use serde_json::{Map, Value};
use simple_schema::SchemaType;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Handle to an annotated type's schema
#[derive(Clone, Copy)]
pub struct SchemaRef {
    id: TypeId,
    name: &'static str,
    ensure: fn() -> DecoratorResult<Arc<ClassSchema>>,
}

impl SchemaRef {
    pub fn of<T: Annotated>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::class_name(),
            ensure: store::ensure_schema::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The class's own schema, registering it on first use
    pub fn ensure(&self) -> DecoratorResult<Arc<ClassSchema>> {
        (self.ensure)()
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SchemaRef {}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaRef").field(&self.name).finish()
    }
}

/// A field type before nested classes are resolved
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    /// Engine type, used as is
    Known(SchemaType),
    /// Another annotated type, validated as a nested object
    Class(SchemaRef),
    /// At least one alternative must match
    OneOf(Vec<TypeDecl>),
}

impl TypeDecl {
    /// Declared type of a Rust type
    pub fn of<T: FieldType>() -> Self {
        T::declared_type().ty
    }

    pub fn class<T: Annotated>() -> Self {
        TypeDecl::Class(SchemaRef::of::<T>())
    }

    pub fn one_of<I, D>(types: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TypeDecl>,
    {
        TypeDecl::OneOf(types.into_iter().map(Into::into).collect())
    }

    /// Whether values of this type may be lists
    pub fn is_list(&self) -> bool {
        match self {
            TypeDecl::Known(ty) => ty.alternatives().iter().any(|t| t.is_array()),
            TypeDecl::Class(_) => false,
            TypeDecl::OneOf(types) => types.iter().any(TypeDecl::is_list),
        }
    }
}

impl From<SchemaType> for TypeDecl {
    fn from(ty: SchemaType) -> Self {
        TypeDecl::Known(ty)
    }
}

impl From<SchemaRef> for TypeDecl {
    fn from(class: SchemaRef) -> Self {
        TypeDecl::Class(class)
    }
}

/// Declared type of a field plus, for lists, the declared member type
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredType {
    pub ty: TypeDecl,
    pub member: Option<Box<DeclaredType>>,
}

impl DeclaredType {
    pub fn new(ty: impl Into<TypeDecl>) -> Self {
        Self {
            ty: ty.into(),
            member: None,
        }
    }

    /// A list whose members have the given declared type
    pub fn list(member: DeclaredType) -> Self {
        Self {
            ty: TypeDecl::Known(SchemaType::Array),
            member: Some(Box::new(member)),
        }
    }
}

/// Rust types that can back a schema field.
///
/// Annotated types are nested classes; `Option<T>` declares the same type
/// as `T` (optionality is a constraint, see `optional`).
pub trait FieldType {
    fn declared_type() -> DeclaredType;
}

macro_rules! impl_field_type {
    ($schema_type:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn declared_type() -> DeclaredType {
                    DeclaredType::new($schema_type)
                }
            }
        )+
    };
}

impl_field_type!(SchemaType::String => String, &'static str, char);
impl_field_type!(SchemaType::Number => f32, f64);
impl_field_type!(
    SchemaType::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);
impl_field_type!(SchemaType::Boolean => bool);
impl_field_type!(SchemaType::Any => Value);
impl_field_type!(SchemaType::Object => Map<String, Value>);

impl<T: FieldType> FieldType for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::list(T::declared_type())
    }
}

impl<T: FieldType, const N: usize> FieldType for [T; N] {
    fn declared_type() -> DeclaredType {
        DeclaredType::list(T::declared_type())
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn declared_type() -> DeclaredType {
        T::declared_type()
    }
}

impl<T: Annotated> FieldType for T {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeDecl::class::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::SchemaBuilder;

    struct Point;

    impl Annotated for Point {
        fn annotate(_schema: &mut SchemaBuilder) {}
    }

    #[test]
    fn test_primitive_declared_types() {
        assert_eq!(TypeDecl::of::<String>(), TypeDecl::Known(SchemaType::String));
        assert_eq!(TypeDecl::of::<f64>(), TypeDecl::Known(SchemaType::Number));
        assert_eq!(TypeDecl::of::<u8>(), TypeDecl::Known(SchemaType::Integer));
        assert_eq!(TypeDecl::of::<bool>(), TypeDecl::Known(SchemaType::Boolean));
        assert_eq!(TypeDecl::of::<Option<i32>>(), TypeDecl::Known(SchemaType::Integer));
        assert_eq!(TypeDecl::of::<Value>(), TypeDecl::Known(SchemaType::Any));
    }

    #[test]
    fn test_list_declared_types_carry_members() {
        let declared = <[f64; 2]>::declared_type();
        assert_eq!(declared.ty, TypeDecl::Known(SchemaType::Array));
        assert_eq!(declared.member.unwrap().ty, TypeDecl::Known(SchemaType::Number));

        let declared = <Vec<Vec<String>>>::declared_type();
        let member = declared.member.unwrap();
        assert!(member.ty.is_list());
        assert_eq!(member.member.unwrap().ty, TypeDecl::Known(SchemaType::String));
    }

    #[test]
    fn test_annotated_types_are_classes() {
        assert_eq!(TypeDecl::of::<Point>(), TypeDecl::class::<Point>());
        let declared = <Vec<Point>>::declared_type();
        assert_eq!(declared.member.unwrap().ty, TypeDecl::class::<Point>());
        assert_eq!(SchemaRef::of::<Point>().name(), "Point");
    }

    #[test]
    fn test_is_list() {
        assert!(TypeDecl::Known(SchemaType::Array).is_list());
        assert!(TypeDecl::one_of([SchemaType::String, SchemaType::Array]).is_list());
        assert!(!TypeDecl::class::<Point>().is_list());
    }
}
