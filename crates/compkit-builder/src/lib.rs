//! Builders for compkit properties and component types
//!
//! [`PropertyBuilder`] assembles a single property step by step and freezes
//! after confirmation. [`TypeBuilder`] declares a whole component type at
//! runtime; the resulting [`DynamicType`] produces [`DynamicComponent`]s that
//! satisfy every contract of `compkit-core`.
//!
//! ```
//! use compkit_builder::{ActionDefinition, PropertyDefinition, TypeBuilder};
//! use compkit_core::{Component, ComponentType, PropertyExt, TypeTag, Value};
//!
//! let counter = TypeBuilder::new("Counter")
//!     .property(PropertyDefinition::new("count", TypeTag::Int))
//!     .action(
//!         ActionDefinition::new("increment")
//!             .returns(TypeTag::Int)
//!             .with_preset(vec![], |props, _| {
//!                 let count = props.get("count").map_or(0, |p| p.get_as::<i64>().unwrap_or(0));
//!                 Ok(Value::Int(count + 1))
//!             }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let c = counter.initialize().set("count", Value::Int(4)).build().unwrap();
//! assert_eq!(c.invoke("increment").unwrap().call().unwrap(), Value::Int(5));
//! ```

#![warn(missing_docs)]

pub mod dynamic;
pub mod error;
pub mod property_builder;
pub mod type_builder;

pub use dynamic::{DynamicComponent, DynamicInitializer, DynamicType};
pub use error::{BuildError, BuildResult};
pub use property_builder::{is_identifier, PropertyBuilder};
pub use type_builder::{
    ActionBody, ActionDefinition, Derivation, PresetDefinition, PropertyDefinition, TypeBuilder,
};
