//! Process-wide schema store
//!
//! Every annotated type gets exactly one [`ClassSchema`], built the first time
//! it is asked for and never changed afterwards:
//!
//! - `ensure_schema::<T>()` returns the stored schema, or builds it: parent
//!   schema first (recursively), then `T`'s own annotations on top
//! - `SCHEMA_STORE` holds the built schemas, keyed by `TypeId`
//!
//! Schemas are built outside the store lock, so building one may ensure
//! others (parents) without deadlocking. If two threads race on the same
//! type, the first insert wins and both get the same `Arc`.

use crate::annotations::Members;
use crate::class::{Annotated, SchemaBuilder};
use crate::error::{DecoratorError, DecoratorResult};
use crate::field::{DeclaredType, TypeDecl};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use simple_schema::{member_key, Constraints};
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Type of a field entry, and whether an annotation stated it explicitly
#[derive(Debug, Clone)]
pub struct TypeSlot {
    pub decl: TypeDecl,
    /// Explicit types are never replaced by the declared Rust type
    pub explicit: bool,
}

impl TypeSlot {
    pub fn explicit(decl: TypeDecl) -> Self {
        Self {
            decl,
            explicit: true,
        }
    }

    pub fn inferred(decl: TypeDecl) -> Self {
        Self {
            decl,
            explicit: false,
        }
    }
}

/// Accumulated constraints for one field (or `<field>.$` member entry)
#[derive(Debug, Clone, Default)]
pub struct FieldConstraintSet {
    pub ty: Option<TypeSlot>,
    pub constraints: Constraints,
    /// Declared Rust member type, for list fields
    pub declared_member: Option<DeclaredType>,
    /// Pending member annotation; turned into the `.$` entry once the
    /// field's final type is known
    pub(crate) members: Option<Members>,
}

/// The field → constraint mapping of one annotated type
#[derive(Debug, Clone)]
pub struct ClassSchema {
    name: &'static str,
    fields: IndexMap<String, FieldConstraintSet>,
}

impl ClassSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: IndexMap::new(),
        }
    }

    /// Start from a parent's fields, copied field for field.
    ///
    /// Inherited types count as inferred: a field the subclass declares again
    /// takes the subclass's declared type.
    pub(crate) fn derived(name: &'static str, parent: &ClassSchema) -> Self {
        let mut fields = parent.fields.clone();
        for slot in fields.values_mut().filter_map(|field| field.ty.as_mut()) {
            slot.explicit = false;
        }
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &str) -> Option<&FieldConstraintSet> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldConstraintSet)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn entry(&mut self, key: &str) -> &mut FieldConstraintSet {
        self.fields.entry(key.to_string()).or_default()
    }

    /// Materialize pending member entries and drop member entries whose
    /// field is no longer a list
    pub(crate) fn finalize(&mut self) {
        let pending: Vec<(String, Members)> = self
            .fields
            .iter_mut()
            .filter_map(|(key, field)| field.members.take().map(|members| (key.clone(), members)))
            .collect();

        for (key, members) in pending {
            if self.is_list(&key) {
                self.fields.insert(member_key(&key), members.into_entry());
            } else {
                tracing::warn!(
                    class = self.name,
                    field = %key,
                    "members declared on a field that is not a list; ignoring them"
                );
            }
        }

        let orphans: Vec<String> = self
            .fields
            .keys()
            .filter_map(|key| key.strip_suffix(".$"))
            .filter(|parent| !self.is_list(parent))
            .map(member_key)
            .collect();
        for key in orphans {
            tracing::warn!(class = self.name, field = %key, "dropping member entry of a non-list field");
            self.fields.shift_remove(&key);
        }
    }

    fn is_list(&self, key: &str) -> bool {
        self.fields
            .get(key)
            .and_then(|field| field.ty.as_ref())
            .map_or(false, |slot| slot.decl.is_list())
    }
}

#[derive(Debug)]
struct StoredSchema {
    /// Full Rust type path, unique per type unlike the short class name
    type_path: &'static str,
    schema: Arc<ClassSchema>,
}

/// Thread-safe store of built class schemas
#[derive(Debug)]
pub struct SchemaStore {
    schemas: RwLock<HashMap<TypeId, StoredSchema>>,
}

impl SchemaStore {
    fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: TypeId) -> Option<Arc<ClassSchema>> {
        self.schemas.read().get(&id).map(|stored| Arc::clone(&stored.schema))
    }

    /// Store a freshly built schema unless another thread got there first
    fn insert(&self, id: TypeId, type_path: &'static str, schema: ClassSchema) -> Arc<ClassSchema> {
        let mut schemas = self.schemas.write();
        let stored = schemas.entry(id).or_insert_with(|| {
            tracing::debug!(
                class = schema.name,
                type_path,
                fields = schema.len(),
                "registered class schema"
            );
            StoredSchema {
                type_path,
                schema: Arc::new(schema),
            }
        });
        Arc::clone(&stored.schema)
    }

    /// Check if a type's schema has been built
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.schemas.read().contains_key(&TypeId::of::<T>())
    }

    /// Get all registered class names.
    ///
    /// Short names; types from different modules may share one. See
    /// [`registered_type_paths`](Self::registered_type_paths).
    pub fn registered_classes(&self) -> Vec<&'static str> {
        self.schemas
            .read()
            .values()
            .map(|stored| stored.schema.name)
            .collect()
    }

    /// Get the full Rust type path of every registered type
    pub fn registered_type_paths(&self) -> Vec<&'static str> {
        self.schemas
            .read()
            .values()
            .map(|stored| stored.type_path)
            .collect()
    }

    /// Get the total number of registered classes
    pub fn count(&self) -> usize {
        self.schemas.read().len()
    }
}

/// Global schema store
pub static SCHEMA_STORE: Lazy<SchemaStore> = Lazy::new(SchemaStore::new);

thread_local! {
    /// Types whose schemas this thread is currently building
    static IN_PROGRESS: RefCell<Vec<(TypeId, &'static str)>> = RefCell::new(Vec::new());
}

struct BuildGuard;

impl BuildGuard {
    fn enter(id: TypeId, name: &'static str) -> DecoratorResult<Self> {
        IN_PROGRESS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(entry, _)| *entry == id) {
                let mut chain: Vec<&'static str> = stack.iter().map(|(_, name)| *name).collect();
                chain.push(name);
                return Err(DecoratorError::InheritanceCycle { class: name, chain });
            }
            stack.push((id, name));
            Ok(BuildGuard)
        })
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        IN_PROGRESS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// `T`'s own schema, building and registering it on first use
pub fn ensure_schema<T: Annotated>() -> DecoratorResult<Arc<ClassSchema>> {
    let id = TypeId::of::<T>();
    if let Some(schema) = SCHEMA_STORE.get(id) {
        return Ok(schema);
    }

    let schema = {
        let _guard = BuildGuard::enter(id, T::class_name())?;
        let mut builder = SchemaBuilder::new(T::class_name());
        T::annotate(&mut builder);
        builder.build()?
    };

    Ok(SCHEMA_STORE.insert(id, std::any::type_name::<T>(), schema))
}
