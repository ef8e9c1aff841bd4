use std::fmt;
use std::sync::Arc;

use compkit_types::{TypeTag, Value};

use super::{check_instance, CloneContext, Property, PropertyRef, ValueFn};
use crate::error::PropertyError;

/// Read-only view of another property
#[derive(Debug)]
pub struct ReadOnlyProperty {
    inner: PropertyRef,
}

impl ReadOnlyProperty {
    /// Wrap `inner`
    pub fn new(inner: PropertyRef) -> Self {
        Self { inner }
    }

    /// Wrapped property
    pub fn inner(&self) -> &PropertyRef {
        &self.inner
    }
}

impl Property for ReadOnlyProperty {
    fn type_tag(&self) -> &TypeTag {
        self.inner.type_tag()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self) -> Value {
        self.inner.get()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn set(&self, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::ReadOnly {
            property: self.inner.name().to_string(),
        })
    }

    fn clone_with(&self, ctx: &mut CloneContext) -> PropertyRef {
        Arc::new(ReadOnlyProperty {
            inner: ctx.clone_property(&self.inner),
        })
    }
}

/// Property whose value is derived from a source property
///
/// Reads apply `forward` to the source value. With a `backward` converter,
/// writes are checked against this property's type, converted and written
/// to the source. Without one, the property is read-only.
pub struct MappedProperty {
    ty: TypeTag,
    name: Option<String>,
    source: PropertyRef,
    forward: ValueFn,
    backward: Option<ValueFn>,
}

impl MappedProperty {
    /// Create a mapped view of `source`
    pub fn new(
        ty: TypeTag,
        source: PropertyRef,
        forward: ValueFn,
        backward: Option<ValueFn>,
    ) -> Self {
        Self {
            ty,
            name: None,
            source,
            forward,
            backward,
        }
    }

    /// Report `name` instead of the source's name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Property this view reads from
    pub fn source(&self) -> &PropertyRef {
        &self.source
    }
}

impl Property for MappedProperty {
    fn type_tag(&self) -> &TypeTag {
        &self.ty
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.source.name())
    }

    fn get(&self) -> Value {
        (self.forward)(&self.source.get())
    }

    fn is_read_only(&self) -> bool {
        self.backward.is_none()
    }

    fn set(&self, value: Value) -> Result<(), PropertyError> {
        let backward = self.backward.as_ref().ok_or_else(|| PropertyError::ReadOnly {
            property: self.name().to_string(),
        })?;
        check_instance(self.name(), &self.ty, &value)?;
        self.source.set(backward(&value))
    }

    fn clone_with(&self, ctx: &mut CloneContext) -> PropertyRef {
        Arc::new(MappedProperty {
            ty: self.ty.clone(),
            name: self.name.clone(),
            source: ctx.clone_property(&self.source),
            forward: self.forward.clone(),
            backward: self.backward.clone(),
        })
    }
}

impl fmt::Debug for MappedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedProperty")
            .field("type", &self.ty)
            .field("name", &self.name())
            .field("source", &self.source)
            .field("bidirectional", &self.backward.is_some())
            .finish()
    }
}
