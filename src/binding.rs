//! Per-type binding descriptors
//!
//! A target type describes itself once through [`Bind::binding`]: its simple name, the name and
//! declared [`FieldType`] of every field a tag may map to, and a factory for fresh instances.
//! Values are written back through [`Bind::set`].
use crate::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A result type for binding operations.
pub type BindResult<T> = std::result::Result<T, BindError>;

/// Failure while resolving, creating, or assigning into a bound type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// The type has no field with this name
    #[error("No field named `{0}`")]
    UnknownField(String),

    /// No binding is registered for the type
    #[error("No binding registered for type `{0}`")]
    UnknownType(String),

    /// The value handed to a setter has the wrong shape
    #[error("Expected a {expected} value, found {found}")]
    TypeMismatch {
        /// The shape the setter wanted
        expected: &'static str,

        /// The shape it was given
        found: &'static str,
    },

    /// Any other setter failure
    #[error("{0}")]
    Custom(String),
}

/// Declared type of a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Text, assigned verbatim
    Text,

    /// 32-bit integer
    Int,

    /// 64-bit integer
    Long,

    /// 32-bit float
    Float,

    /// 64-bit float
    Double,

    /// `true` / `false`
    Bool,

    /// Any other scalar. Receives the trimmed text unconverted, as [`Value::Text`]
    Raw,

    /// A nested object, resolved by type identity
    Object(TypeId),

    /// A list; the element type is only known by its registered name
    List(&'static str),
}
impl FieldType {
    /// A nested object field of type `T`.
    #[must_use]
    pub fn object<T: Bind>() -> Self {
        Self::Object(TypeId::of::<T>())
    }

    /// A list field whose elements are of the type registered under `element`.
    #[must_use]
    pub fn list(element: &'static str) -> Self {
        Self::List(element)
    }

    /// True for the types captured from element text on close.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Object(_) | Self::List(_))
    }
}

/// Blanket upcast to [`Any`], so `dyn Bind` values can be downcast to their concrete type.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Convert a boxed value into `Box<dyn Any>`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}
impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A type that XML can be bound into.
///
/// ```rust
/// use xmlbind::{Bind, BindError, BindResult, FieldType, TypeBinding, Value};
///
/// #[derive(Debug, Default)]
/// struct Item {
///     id: String,
///     count: i32,
/// }
/// impl Bind for Item {
///     fn binding() -> TypeBinding {
///         TypeBinding::new::<Self>("Item")
///             .field("id", FieldType::Text)
///             .field("count", FieldType::Int)
///     }
///
///     fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
///         match field {
///             "id" => self.id = value.into_text()?,
///             "count" => self.count = value.into_i32()?,
///             _ => return Err(BindError::UnknownField(field.to_string())),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Bind: AsAny + std::fmt::Debug {
    /// The static descriptor for this type.
    fn binding() -> TypeBinding
    where
        Self: Sized;

    /// Assign `value` to the field named `field`.
    ///
    /// # Errors
    /// Returns an error if the field does not exist or the value has the wrong shape.
    /// The parser drops the value and carries on when this fails.
    fn set(&mut self, field: &str, value: Value) -> BindResult<()>;
}
impl dyn Bind {
    /// The concrete type of this value.
    #[must_use]
    pub fn type_key(&self) -> TypeId {
        AsAny::as_any(self).type_id()
    }

    /// True if the concrete type is `T`.
    #[must_use]
    pub fn is<T: Bind>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }

    /// Borrow as `T`, if that is the concrete type.
    #[must_use]
    pub fn downcast_ref<T: Bind>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    /// Convert into a `Box<T>`, if that is the concrete type.
    /// The value is dropped if it is not a `T`; check with [`Self::is`] first to keep it.
    #[must_use]
    pub fn downcast<T: Bind>(self: Box<Self>) -> Option<Box<T>> {
        AsAny::into_any(self).downcast::<T>().ok()
    }
}

/// Static description of one bound type.
///
/// Built once per type through [`Bind::binding`] and cached by the [`crate::Registry`].
#[derive(Clone)]
pub struct TypeBinding {
    name: &'static str,
    type_id: TypeId,
    fields: HashMap<&'static str, FieldType>,
    factory: fn() -> Box<dyn Bind>,
}
impl TypeBinding {
    /// Describe `T` under its simple name, constructed through `Default`.
    #[must_use]
    pub fn new<T: Bind + Default>(name: &'static str) -> Self {
        Self::with_factory::<T>(name, default_factory::<T>)
    }

    /// Describe `T` under its simple name, constructed through `factory`.
    #[must_use]
    pub fn with_factory<T: Bind>(name: &'static str, factory: fn() -> Box<dyn Bind>) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            fields: HashMap::new(),
            factory,
        }
    }

    /// Declare a field. Declaring the same name twice keeps the last type.
    #[must_use]
    pub fn field(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.insert(name, ty);
        self
    }

    /// The simple name of the type. This is also the root tag name when the type is parsed.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The identity of the described type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The declared type of a field, if the field exists.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Number of declared fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Create a fresh instance of the described type.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Bind> {
        (self.factory)()
    }
}
impl std::fmt::Debug for TypeBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeBinding")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

fn default_factory<T: Bind + Default>() -> Box<dyn Bind> {
    Box::new(T::default())
}
