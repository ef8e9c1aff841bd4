//! Property system
//!
//! A property is a named, typed value cell. Three variants exist:
//!
//! - [`SimpleProperty`]: owns its value and checks writes against its type
//! - [`ReadOnlyProperty`]: delegates reads to a wrapped property, rejects writes
//! - [`MappedProperty`]: a live view of a source property through a forward
//!   converter, optionally writable through a backward converter
//!
//! Properties are shared as [`PropertyRef`] (`Arc<dyn Property>`) and use
//! interior mutability, so a mapped view and its source observe the same
//! state. The name and type of a property never change after construction.
//!
//! Every writable variant raises [`PropertyError::TypeMismatch`] for a value
//! that is not an instance of its declared type, and leaves its state
//! untouched.

mod clone;
mod derived;
mod set;
mod simple;

use std::fmt;
use std::sync::Arc;

use compkit_types::{FromValue, TypeError, TypeTag, Value};

use crate::error::PropertyError;

pub use clone::CloneContext;
pub use derived::{MappedProperty, ReadOnlyProperty};
pub use set::PropertySet;
pub use simple::SimpleProperty;

/// Shared handle to a property
pub type PropertyRef = Arc<dyn Property>;

/// Value transformation used by converters and clone functions
pub type ValueFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Named, typed value cell
pub trait Property: Send + Sync + fmt::Debug {
    /// Declared type of the value
    fn type_tag(&self) -> &TypeTag;

    /// Property name
    fn name(&self) -> &str;

    /// Current value
    fn get(&self) -> Value;

    /// Whether writes are rejected
    fn is_read_only(&self) -> bool;

    /// Replace the value
    ///
    /// Fails with [`PropertyError::ReadOnly`] on read-only properties and
    /// with [`PropertyError::TypeMismatch`] when `value` is not an instance
    /// of [`Property::type_tag`].
    fn set(&self, value: Value) -> Result<(), PropertyError>;

    /// Produce an independent copy, cloning linked properties through `ctx`
    fn clone_with(&self, ctx: &mut CloneContext) -> PropertyRef;
}

/// Check `value` against a property's declared type
pub(crate) fn check_instance(
    name: &str,
    ty: &TypeTag,
    value: &Value,
) -> Result<(), PropertyError> {
    if ty.is_instance(value) {
        Ok(())
    } else {
        Err(PropertyError::TypeMismatch {
            property: name.to_string(),
            expected: ty.clone(),
            actual: value.type_tag(),
        })
    }
}

/// Operations available on every shared property handle
pub trait PropertyExt {
    /// Read the value and pass it through `mapper`
    fn get_with<R>(&self, mapper: impl FnOnce(Value) -> R) -> R;

    /// Read the value as a Rust type
    fn get_as<T: FromValue>(&self) -> Result<T, TypeError>;

    /// Read-only view of this property converted to `ty`
    fn map(
        &self,
        ty: TypeTag,
        forward: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> PropertyRef;

    /// Writable view of this property converted to `ty`
    ///
    /// Writes are checked against `ty`, converted with `backward` and
    /// routed to this property.
    fn map_bidirectional(
        &self,
        ty: TypeTag,
        forward: impl Fn(&Value) -> Value + Send + Sync + 'static,
        backward: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> PropertyRef;

    /// This property if already read-only, otherwise a read-only wrapper
    fn as_read_only(&self) -> PropertyRef;

    /// Independent copy with its own value (and its own copy of any source)
    fn deep_clone(&self) -> PropertyRef;
}

impl PropertyExt for PropertyRef {
    fn get_with<R>(&self, mapper: impl FnOnce(Value) -> R) -> R {
        mapper(self.get())
    }

    fn get_as<T: FromValue>(&self) -> Result<T, TypeError> {
        T::from_value(&self.get())
    }

    fn map(
        &self,
        ty: TypeTag,
        forward: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> PropertyRef {
        Arc::new(MappedProperty::new(ty, self.clone(), Arc::new(forward), None))
    }

    fn map_bidirectional(
        &self,
        ty: TypeTag,
        forward: impl Fn(&Value) -> Value + Send + Sync + 'static,
        backward: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> PropertyRef {
        Arc::new(MappedProperty::new(
            ty,
            self.clone(),
            Arc::new(forward),
            Some(Arc::new(backward)),
        ))
    }

    fn as_read_only(&self) -> PropertyRef {
        if self.is_read_only() {
            self.clone()
        } else {
            Arc::new(ReadOnlyProperty::new(self.clone()))
        }
    }

    fn deep_clone(&self) -> PropertyRef {
        CloneContext::new().clone_property(self)
    }
}
