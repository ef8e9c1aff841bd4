//! Error types for the component runtime

use compkit_types::{TypeError, TypeTag};
use thiserror::Error;

/// Boxed error carried as the cause of an action failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Component operation result
pub type ComponentResult<T> = Result<T, ComponentError>;

/// Errors raised by property reads and writes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// Write attempted on a read-only property
    #[error("Property \"{property}\" is read-only")]
    ReadOnly {
        /// Property name
        property: String,
    },

    /// Value is not an instance of the property's declared type
    #[error("Type mismatch on property \"{property}\": expected {expected}, got {actual}")]
    TypeMismatch {
        /// Property name
        property: String,
        /// Declared type
        expected: TypeTag,
        /// Runtime type of the rejected value
        actual: TypeTag,
    },
}

/// Errors raised by action invocation
#[derive(Debug, Error)]
pub enum ActionError {
    /// No preset accepts the bound arguments
    #[error("No preset of action \"{action}\" in component {component} accepts the arguments: {reason}")]
    Unresolved {
        /// Type name of the owning component
        component: String,
        /// Action name
        action: String,
        /// Why the last candidate preset was rejected
        reason: String,
    },

    /// The invoked operation failed
    #[error("Exception occurred in action \"{action}\" of component {component}")]
    Failed {
        /// Type name of the owning component
        component: String,
        /// Action name
        action: String,
        /// Underlying cause
        source: BoxError,
    },
}

impl ActionError {
    /// Name of the action that failed
    pub fn action(&self) -> &str {
        match self {
            ActionError::Unresolved { action, .. } | ActionError::Failed { action, .. } => action,
        }
    }

    /// Type name of the component owning the action
    pub fn component(&self) -> &str {
        match self {
            ActionError::Unresolved { component, .. } | ActionError::Failed { component, .. } => {
                component
            }
        }
    }
}

/// Errors raised by child list operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// No child with the given name
    #[error("No child named '{0}'")]
    NotFound(String),

    /// A child with the given name already exists
    #[error("Duplicate name '{0}'")]
    DuplicateName(String),

    /// Index outside `[0, len)`
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// List length at the time of the call
        len: usize,
    },
}

/// Errors raised at the component boundary
#[derive(Debug, Error)]
pub enum ComponentError {
    /// No property with the given name
    #[error("No such property: \"{property}\" in component {component}")]
    NoSuchProperty {
        /// Component type name
        component: String,
        /// Requested property name
        property: String,
    },

    /// No action with the given name
    #[error("No such action: \"{action}\" in component {component}")]
    NoSuchAction {
        /// Component type name
        component: String,
        /// Requested action name
        action: String,
    },

    /// Mapper's source type does not accept the component
    #[error("Unsuitable mapper: expects {expected}, component is {actual}")]
    IncompatibleMapper {
        /// Mapper source type name
        expected: String,
        /// Component type name
        actual: String,
    },

    /// Component is not an instance of the cast target
    #[error("Component {component} cannot be cast to {target}")]
    Cast {
        /// Component type name
        component: String,
        /// Target type name
        target: String,
    },

    /// Property failure
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Action failure
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Child list failure
    #[error(transparent)]
    List(#[from] ListError),

    /// Typed extraction failure
    #[error(transparent)]
    Type(#[from] TypeError),
}
