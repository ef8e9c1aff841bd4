//! Error types for builders

use compkit_types::TypeTag;
use thiserror::Error;

/// Builder result
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while declaring properties and component types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Name is not an identifier
    #[error("Name '{0}' is not a valid identifier")]
    InvalidName(String),

    /// Property type was never set
    #[error("Property type was not set")]
    MissingType,

    /// Property name was never set
    #[error("Property name was not set")]
    MissingName,

    /// Builder was already confirmed and can not be modified
    #[error("Property was built and can not be modified")]
    AlreadyBuilt,

    /// Two members of the same kind share a name
    #[error("Duplicate {kind} '{member}' in type {owner}")]
    DuplicateMember {
        /// Type being declared
        owner: String,
        /// Member kind ("property", "action" or "child")
        kind: &'static str,
        /// Repeated name
        member: String,
    },

    /// Initial value is not an instance of the declared type
    #[error("Initial value of '{property}' is not an instance of {expected} (got {actual})")]
    InvalidInitialValue {
        /// Property name
        property: String,
        /// Declared type
        expected: TypeTag,
        /// Runtime type of the rejected value
        actual: TypeTag,
    },

    /// Initial value given to a derived property that cannot write back
    #[error("Initial value of '{0}' cannot be written: the derivation has no backward converter")]
    UnwritableInitialValue(String),

    /// Derived property names a source that is not declared before it
    #[error("Property '{property}' is derived from undeclared property '{origin}'")]
    UnknownSource {
        /// Derived property name
        property: String,
        /// Missing source name
        origin: String,
    },
}

impl BuildError {
    pub(crate) fn invalid_initial_value(property: &str, expected: &TypeTag, actual: TypeTag) -> Self {
        BuildError::InvalidInitialValue {
            property: property.to_string(),
            expected: expected.clone(),
            actual,
        }
    }
}
