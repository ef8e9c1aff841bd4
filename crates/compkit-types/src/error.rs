//! Type system errors

use thiserror::Error;

use crate::ty::TypeTag;

/// Errors raised when a value does not fit a declared type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// Type mismatch between expected and actual types
    #[error("Type mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// Expected type
        expected: TypeTag,
        /// Actual type
        actual: TypeTag,
    },
}

impl TypeError {
    /// Shorthand for a [`TypeError::Mismatch`]
    pub fn mismatch(expected: TypeTag, actual: TypeTag) -> Self {
        TypeError::Mismatch { expected, actual }
    }
}
