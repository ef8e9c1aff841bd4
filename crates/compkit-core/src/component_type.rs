//! Component type descriptors

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use compkit_types::Value;

use crate::component::{Component, ComponentRef};
use crate::error::{ComponentError, ComponentResult};

/// Shared handle to a type descriptor
pub type ComponentTypeRef = Arc<dyn ComponentType>;

/// Structural contract a component implementation satisfies
///
/// A component conforms when it exposes at least the declared property and
/// action names.
pub trait ComponentType: Send + Sync + fmt::Debug {
    /// Type name used in diagnostics
    fn name(&self) -> &str;

    /// Declared property names
    fn properties(&self) -> BTreeSet<String>;

    /// Declared action names
    fn actions(&self) -> BTreeSet<String>;

    /// Whether `component` exposes every declared property and action
    fn is_instance(&self, component: &dyn Component) -> bool {
        self.properties()
            .iter()
            .all(|name| component.property(name).is_some())
            && self
                .actions()
                .iter()
                .all(|name| component.action(name).is_some())
    }

    /// Return `component` unchanged if it conforms, fail otherwise
    fn cast(&self, component: ComponentRef) -> ComponentResult<ComponentRef> {
        if self.is_instance(component.as_ref()) {
            Ok(component)
        } else {
            Err(ComponentError::Cast {
                component: component.component_type().name().to_string(),
                target: self.name().to_string(),
            })
        }
    }

    /// Start building a new instance of this type
    fn initialize(&self) -> Box<dyn Initializer>;
}

/// Builder for new component instances
///
/// Values are recorded by `set` and checked when the instance is built.
pub trait Initializer: Send {
    /// Record an initial value for a property
    fn set(&mut self, name: &str, value: Value) -> &mut dyn Initializer;

    /// Construct the instance
    ///
    /// Fails with [`ComponentError::NoSuchProperty`] for a recorded name
    /// the type does not declare and with a property error for a value the
    /// property rejects.
    fn build(&self) -> ComponentResult<ComponentRef>;
}
