//! Core type tag definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Runtime type tag of a property, parameter or action result
///
/// The set of tags is closed: a component can only declare values that
/// one of these variants describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Top type, accepts every value
    Any,
    /// No value (action results only)
    Void,
    /// The `null` type
    Null,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Any numeric value (`Int` or `Float`)
    Number,
    /// UTF-8 string
    Str,
    /// Homogeneous array: T[]
    Array(Box<TypeTag>),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Any => write!(f, "any"),
            TypeTag::Void => write!(f, "void"),
            TypeTag::Null => write!(f, "null"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Number => write!(f, "number"),
            TypeTag::Str => write!(f, "string"),
            TypeTag::Array(element) => write!(f, "{}[]", element),
        }
    }
}

impl TypeTag {
    /// Create an array tag with the given element type
    pub fn array(element: TypeTag) -> Self {
        TypeTag::Array(Box::new(element))
    }

    /// Check if this tag is numeric (`Int`, `Float` or `Number`)
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Float | TypeTag::Number)
    }

    /// Check if this tag is an array
    pub fn is_array(&self) -> bool {
        matches!(self, TypeTag::Array(_))
    }

    /// Check if this tag is `Void`
    pub fn is_void(&self) -> bool {
        matches!(self, TypeTag::Void)
    }

    /// Get the element tag if this is an array
    pub fn element(&self) -> Option<&TypeTag> {
        match self {
            TypeTag::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Check whether `value` is an instance of this tag
    pub fn is_instance(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeTag::Any, _) => true,
            (TypeTag::Void | TypeTag::Null, Value::Null) => true,
            (TypeTag::Bool, Value::Bool(_)) => true,
            (TypeTag::Int, Value::Int(_)) => true,
            (TypeTag::Float, Value::Float(_)) => true,
            (TypeTag::Number, Value::Int(_) | Value::Float(_)) => true,
            (TypeTag::Str, Value::Str(_)) => true,
            (TypeTag::Array(element), Value::Array(items)) => {
                items.iter().all(|item| element.is_instance(item))
            }
            _ => false,
        }
    }

    /// Value held by a property of this type when none is supplied
    pub fn default_value(&self) -> Value {
        match self {
            TypeTag::Any | TypeTag::Void | TypeTag::Null => Value::Null,
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Int | TypeTag::Number => Value::Int(0),
            TypeTag::Float => Value::Float(0.0),
            TypeTag::Str => Value::Str(String::new()),
            TypeTag::Array(_) => Value::Array(Vec::new()),
        }
    }
}
