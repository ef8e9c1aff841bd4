//! Typed extraction from dynamic values.
//!
//! Implement `FromValue` to pull a Rust type out of a [`Value`] read from a
//! property or returned by an action. Extraction checks the value against
//! the Rust type's tag and never converts between unrelated types.
//!
//! # Example
//!
//! ```
//! use compkit_types::{FromValue, Value};
//!
//! let v = Value::from(vec![1_i64, 2, 3]);
//! let ints = Vec::<i64>::from_value(&v).unwrap();
//! assert_eq!(ints, vec![1, 2, 3]);
//! ```

use crate::error::TypeError;
use crate::ty::TypeTag;
use crate::value::Value;

/// Convert a dynamic value into a Rust type
pub trait FromValue: Sized {
    /// Tag describing the values this type accepts
    fn type_tag() -> TypeTag;

    /// Convert from a value, failing with [`TypeError::Mismatch`]
    fn from_value(value: &Value) -> Result<Self, TypeError>;
}

fn mismatch<T: FromValue>(value: &Value) -> TypeError {
    TypeError::mismatch(T::type_tag(), value.type_tag())
}

impl FromValue for Value {
    fn type_tag() -> TypeTag {
        TypeTag::Any
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn type_tag() -> TypeTag {
        TypeTag::Bool
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for i64 {
    fn type_tag() -> TypeTag {
        TypeTag::Int
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        value.as_int().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for i32 {
    fn type_tag() -> TypeTag {
        TypeTag::Int
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        value
            .as_int()
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for f64 {
    fn type_tag() -> TypeTag {
        TypeTag::Number
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        value.as_float().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for String {
    fn type_tag() -> TypeTag {
        TypeTag::Str
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::array(T::type_tag())
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        let items = value.as_array().ok_or_else(|| mismatch::<Self>(value))?;
        items.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn from_value(value: &Value) -> Result<Self, TypeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}
