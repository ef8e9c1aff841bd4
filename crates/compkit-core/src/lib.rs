//! Compkit runtime object model
//!
//! Components are trees of named, typed nodes reached purely through string
//! identifiers:
//!
//! - [`property`]: typed value cells, including read-only and mapped views
//! - [`action`]: overloaded operations invoked through an argument context
//! - [`list`]: ordered, uniquely named children with cached name lookup
//! - [`component_type`] and [`mapper`]: structural type descriptors and
//!   conversion between them
//! - [`component`]: the composition contract tying these together
//!
//! Concrete components are produced elsewhere (see `compkit-builder`); this
//! crate defines the contracts they satisfy and the machinery behind them.

#![warn(missing_docs)]

pub mod action;
pub mod component;
pub mod component_type;
pub mod config;
pub mod error;
pub mod list;
pub mod mapper;
pub mod property;

#[cfg(test)]
mod testing;

pub use action::{Action, ActionContext, MappedActionContext, Parameter, Preset};
pub use component::{Component, ComponentRef};
pub use component_type::{ComponentType, ComponentTypeRef, Initializer};
pub use config::{ConfigError, CoreConfig, ListConfig};
pub use error::{ActionError, BoxError, ComponentError, ComponentResult, ListError, PropertyError};
pub use list::ComponentList;
pub use mapper::Mapper;
pub use property::{
    CloneContext, MappedProperty, Property, PropertyExt, PropertyRef, PropertySet,
    ReadOnlyProperty, SimpleProperty,
};

pub use compkit_types::{FromValue, TypeError, TypeTag, Value};
