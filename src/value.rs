use crate::{Bind, BindError, BindResult};

/// A fully materialized value, as handed to [`Bind::set`] and to tag listeners.
///
/// Scalars arrive already converted to the field's declared type.
/// Objects and list elements are type-erased; use [`Value::into_object`] and friends to recover them.
#[derive(Debug)]
pub enum Value {
    /// Text, or the raw text of a [`crate::FieldType::Raw`] field
    Text(String),

    /// 32-bit integer
    Int(i32),

    /// 64-bit integer
    Long(i64),

    /// 32-bit float
    Float(f32),

    /// 64-bit float
    Double(f64),

    /// Boolean
    Bool(bool),

    /// A nested object
    Object(Box<dyn Bind>),

    /// A list of objects, in document order
    List(Vec<Box<dyn Bind>>),
}
impl Value {
    /// A short name for the shape of the value, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::Object(_) => "object",
            Self::List(_) => "list",
        }
    }

    /// Borrow the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the object as `T`, if this is an object of that type.
    #[must_use]
    pub fn as_object<T: Bind>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Borrow the elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Box<dyn Bind>]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Take the text out of a text value.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape.
    pub fn into_text(self) -> BindResult<String> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(other.mismatch("text")),
        }
    }

    /// Take an `i32` out of an int value.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape.
    pub fn into_i32(self) -> BindResult<i32> {
        match self {
            Self::Int(value) => Ok(value),
            other => Err(other.mismatch("int")),
        }
    }

    /// Take an `i64` out of a long or int value.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape.
    pub fn into_i64(self) -> BindResult<i64> {
        match self {
            Self::Long(value) => Ok(value),
            Self::Int(value) => Ok(i64::from(value)),
            other => Err(other.mismatch("long")),
        }
    }

    /// Take an `f32` out of a float value.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape.
    pub fn into_f32(self) -> BindResult<f32> {
        match self {
            Self::Float(value) => Ok(value),
            other => Err(other.mismatch("float")),
        }
    }

    /// Take an `f64` out of a double or float value.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape.
    pub fn into_f64(self) -> BindResult<f64> {
        match self {
            Self::Double(value) => Ok(value),
            Self::Float(value) => Ok(f64::from(value)),
            other => Err(other.mismatch("double")),
        }
    }

    /// Take a `bool` out of a bool value.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape.
    pub fn into_bool(self) -> BindResult<bool> {
        match self {
            Self::Bool(value) => Ok(value),
            other => Err(other.mismatch("bool")),
        }
    }

    /// Take the object out of an object value, as `T`.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape, or an object of another type.
    pub fn into_object<T: Bind>(self) -> BindResult<T> {
        match self {
            Self::Object(object) => object
                .downcast::<T>()
                .map(|object| *object)
                .ok_or_else(|| BindError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                    found: "object",
                }),
            other => Err(other.mismatch("object")),
        }
    }

    /// Take the elements out of a list value, each as `T`.
    ///
    /// # Errors
    /// Fails with [`BindError::TypeMismatch`] for any other shape, or if an element is of another type.
    pub fn into_list<T: Bind>(self) -> BindResult<Vec<T>> {
        match self {
            Self::List(items) => items
                .into_iter()
                .map(|item| Self::Object(item).into_object::<T>())
                .collect(),
            other => Err(other.mismatch("list")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> BindError {
        BindError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}
