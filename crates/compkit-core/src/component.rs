//! The component contract
//!
//! A component exposes named properties, named actions and an ordered list
//! of named children, all reachable by string identifiers. Implementations
//! supply the required lookups; reads, writes and invocation by name are
//! provided on top of them.

use std::fmt;
use std::sync::Arc;

use compkit_types::{FromValue, Value};

use crate::action::{Action, ActionContext};
use crate::component_type::ComponentTypeRef;
use crate::error::{ComponentError, ComponentResult};
use crate::list::ComponentList;
use crate::mapper::Mapper;
use crate::property::PropertyRef;

/// Shared handle to a component
pub type ComponentRef = Arc<dyn Component>;

/// Node of a component tree
pub trait Component: Send + Sync + fmt::Debug {
    /// Descriptor of this component's type
    fn component_type(&self) -> ComponentTypeRef;

    /// Property called `name`, if any
    fn property(&self, name: &str) -> Option<PropertyRef>;

    /// Action called `name`, if any
    fn action(&self, name: &str) -> Option<Action>;

    /// Child components
    fn children(&self) -> &ComponentList;

    /// Deep copy sharing no mutable state with this component
    fn clone_component(&self) -> ComponentRef;

    /// Mapper this component prefers when converted to `target`
    fn mapper_for(&self, _target: &ComponentTypeRef) -> Option<Mapper> {
        None
    }

    /// Read a property
    fn get(&self, name: &str) -> ComponentResult<Value> {
        self.property(name)
            .map(|p| p.get())
            .ok_or_else(|| no_such_property(self, name))
    }

    /// Write a property
    fn set(&self, name: &str, value: Value) -> ComponentResult<()> {
        let property = self
            .property(name)
            .ok_or_else(|| no_such_property(self, name))?;
        property.set(value)?;
        Ok(())
    }

    /// Fresh context for invoking an action
    fn invoke(&self, name: &str) -> ComponentResult<Box<dyn ActionContext>> {
        self.action(name)
            .map(|a| a.create_context())
            .ok_or_else(|| ComponentError::NoSuchAction {
                component: self.component_type().name().to_string(),
                action: name.to_string(),
            })
    }
}

fn no_such_property<C: Component + ?Sized>(component: &C, name: &str) -> ComponentError {
    ComponentError::NoSuchProperty {
        component: component.component_type().name().to_string(),
        property: name.to_string(),
    }
}

impl<'a> dyn Component + 'a {
    /// Convert with `mapper`
    ///
    /// Fails with [`ComponentError::IncompatibleMapper`] if the mapper's
    /// source type does not accept this component.
    pub fn map(&self, mapper: &Mapper) -> ComponentResult<ComponentRef> {
        if !mapper.from_type().is_instance(self) {
            return Err(ComponentError::IncompatibleMapper {
                expected: mapper.from_type().name().to_string(),
                actual: self.component_type().name().to_string(),
            });
        }
        mapper.apply(self)
    }

    /// Convert to `target`, using this component's own mapper if it has one
    pub fn as_type(&self, target: &ComponentTypeRef) -> ComponentResult<ComponentRef> {
        let mapper = self
            .mapper_for(target)
            .unwrap_or_else(|| Mapper::default_mapper(self.component_type(), target.clone()));
        self.map(&mapper)
    }

    /// Read a property and pass the value through `f`
    pub fn get_with<R>(&self, name: &str, f: impl FnOnce(Value) -> R) -> ComponentResult<R> {
        self.get(name).map(f)
    }

    /// Read a property as a Rust type
    pub fn get_as<T: FromValue>(&self, name: &str) -> ComponentResult<T> {
        Ok(T::from_value(&self.get(name)?)?)
    }
}
