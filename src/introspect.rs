//! Type introspection
//!
//! The parser never touches a target type directly; it asks an [`Introspector`] for field types
//! and fresh instances. [`Registry`] is the provided implementation.
use crate::{Bind, BindError, BindResult, FieldType, TypeBinding};
use std::any::TypeId;
use std::collections::HashMap;

/// Resolves fields and creates instances for the parser.
///
/// Nested objects are created by type identity (from [`FieldType::Object`]), list elements by
/// name (from [`FieldType::List`]), so both paths must be supported.
pub trait Introspector {
    /// The simple name of a type. The root type's simple name is the root tag name.
    fn type_name(&self, ty: TypeId) -> Option<&str>;

    /// The declared type of the field `name` on the type `ty`, if there is one.
    fn field(&self, ty: TypeId, name: &str) -> Option<FieldType>;

    /// Create a new instance of the type `ty`.
    ///
    /// # Errors
    /// Fails if the type is unknown.
    fn instance(&self, ty: TypeId) -> BindResult<Box<dyn Bind>>;

    /// Create a new instance of the type registered under `name`.
    ///
    /// # Errors
    /// Fails if no type is known by that name.
    fn instance_named(&self, name: &str) -> BindResult<Box<dyn Bind>>;
}

/// A set of [`TypeBinding`]s, indexed by type identity and by simple name.
///
/// Every type reachable from the root must be registered: nested object types and list element types.
///
/// ```rust
/// # use xmlbind::{Bind, BindError, BindResult, FieldType, TypeBinding, Value};
/// # #[derive(Debug, Default)]
/// # struct Item;
/// # impl Bind for Item {
/// #     fn binding() -> TypeBinding { TypeBinding::new::<Self>("Item") }
/// #     fn set(&mut self, field: &str, _: Value) -> BindResult<()> {
/// #         Err(BindError::UnknownField(field.to_string()))
/// #     }
/// # }
/// use xmlbind::{Introspector, Registry};
///
/// let registry = Registry::new().with::<Item>();
/// assert!(registry.instance_named("Item").is_ok());
/// assert!(registry.instance_named("Missing").is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Registry {
    bindings: HashMap<TypeId, TypeBinding>,
    names: HashMap<&'static str, TypeId>,
}
impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` using its own [`Bind::binding`].
    pub fn register<T: Bind>(&mut self) -> &mut Self {
        self.insert(T::binding())
    }

    /// Register `T`, builder style.
    #[must_use]
    pub fn with<T: Bind>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Register a hand-built binding. A binding for the same type or name replaces the old one.
    pub fn insert(&mut self, binding: TypeBinding) -> &mut Self {
        if let Some(old) = self.bindings.get(&binding.type_id()) {
            self.names.remove(old.name());
        }

        self.names.insert(binding.name(), binding.type_id());
        self.bindings.insert(binding.type_id(), binding);
        self
    }

    /// The binding for a type, if registered.
    #[must_use]
    pub fn binding(&self, ty: TypeId) -> Option<&TypeBinding> {
        self.bindings.get(&ty)
    }

    /// The binding registered under a simple name.
    #[must_use]
    pub fn binding_named(&self, name: &str) -> Option<&TypeBinding> {
        self.names.get(name).and_then(|ty| self.bindings.get(ty))
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
impl Introspector for Registry {
    fn type_name(&self, ty: TypeId) -> Option<&str> {
        self.binding(ty).map(TypeBinding::name)
    }

    fn field(&self, ty: TypeId, name: &str) -> Option<FieldType> {
        self.binding(ty)?.get_field(name)
    }

    fn instance(&self, ty: TypeId) -> BindResult<Box<dyn Bind>> {
        self.binding(ty)
            .map(TypeBinding::instantiate)
            .ok_or_else(|| BindError::UnknownType(format!("{ty:?}")))
    }

    fn instance_named(&self, name: &str) -> BindResult<Box<dyn Bind>> {
        self.binding_named(name)
            .map(TypeBinding::instantiate)
            .ok_or_else(|| BindError::UnknownType(name.to_string()))
    }
}
