//! Dynamic values crossing the string-keyed component boundary
//!
//! Property reads, property writes, action arguments and action results
//! are all carried as `Value`. Each variant owns its data, so cloning a
//! value never aliases the original.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ty::TypeTag;

/// Dynamically typed value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// null
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Array of values
    Array(Vec<Value>),
}

impl Value {
    /// Most specific runtime tag of this value
    ///
    /// Arrays report their element tag when every element shares it;
    /// empty and mixed arrays report `any[]`.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::Array(items) => {
                let mut tags = items.iter().map(Value::type_tag);
                let element = match tags.next() {
                    Some(first) if tags.all(|t| t == first) => first,
                    _ => TypeTag::Any,
                };
                TypeTag::array(element)
            }
        }
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract float value (integers are widened)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_primitives() {
        assert_eq!(Value::Null.type_tag(), TypeTag::Null);
        assert_eq!(Value::from(true).type_tag(), TypeTag::Bool);
        assert_eq!(Value::from(7).type_tag(), TypeTag::Int);
        assert_eq!(Value::from(1.5).type_tag(), TypeTag::Float);
        assert_eq!(Value::from("hi").type_tag(), TypeTag::Str);
    }

    #[test]
    fn test_type_tag_arrays() {
        assert_eq!(
            Value::from(vec![1, 2]).type_tag(),
            TypeTag::array(TypeTag::Int)
        );
        assert_eq!(
            Value::Array(vec![]).type_tag(),
            TypeTag::array(TypeTag::Any)
        );
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Bool(true)]).type_tag(),
            TypeTag::array(TypeTag::Any)
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(3).as_int(), Some(3));
        assert_eq!(Value::from(3).as_float(), Some(3.0));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert!(Value::from(3).as_str().is_none());
        assert_eq!(Value::from(vec![1]).as_array().map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5_i64)), Value::Int(5));
    }

    #[test]
    fn test_display() {
        let v = Value::Array(vec![Value::Int(1), Value::from("a"), Value::Null]);
        assert_eq!(v.to_string(), "[1, \"a\", null]");
    }
}
