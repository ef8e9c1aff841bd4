use std::fmt;
use std::sync::Arc;

use compkit_types::{TypeTag, Value};
use parking_lot::RwLock;
use tracing::trace;

use super::{check_instance, CloneContext, Property, PropertyRef, ValueFn};
use crate::error::PropertyError;

/// Property that owns its value
pub struct SimpleProperty {
    name: String,
    ty: TypeTag,
    value: RwLock<Value>,
    clone_fn: Option<ValueFn>,
}

impl SimpleProperty {
    /// Create a property holding the default value of `ty`
    pub fn new(name: impl Into<String>, ty: TypeTag) -> Self {
        let value = ty.default_value();
        Self {
            name: name.into(),
            ty,
            value: RwLock::new(value),
            clone_fn: None,
        }
    }

    /// Create a property with an initial value
    ///
    /// Fails if `value` is not an instance of `ty`.
    pub fn with_value(
        name: impl Into<String>,
        ty: TypeTag,
        value: Value,
    ) -> Result<Self, PropertyError> {
        let name = name.into();
        check_instance(&name, &ty, &value)?;
        Ok(Self {
            name,
            ty,
            value: RwLock::new(value),
            clone_fn: None,
        })
    }

    /// Copy values through `f` when this property is cloned
    pub fn with_clone_fn(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.clone_fn = Some(Arc::new(f));
        self
    }

    /// Wrap in a shared handle
    pub fn into_ref(self) -> PropertyRef {
        Arc::new(self)
    }
}

impl Property for SimpleProperty {
    fn type_tag(&self) -> &TypeTag {
        &self.ty
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self) -> Value {
        self.value.read().clone()
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn set(&self, value: Value) -> Result<(), PropertyError> {
        check_instance(&self.name, &self.ty, &value)?;
        *self.value.write() = value;
        Ok(())
    }

    fn clone_with(&self, _ctx: &mut CloneContext) -> PropertyRef {
        let current = self.value.read();
        let value = match &self.clone_fn {
            Some(f) => {
                let copied = f(&current);
                if self.ty.is_instance(&copied) {
                    copied
                } else {
                    // Keep the clone an instance of its type
                    trace!(
                        property = %self.name,
                        expected = %self.ty,
                        actual = %copied.type_tag(),
                        "clone function result rejected"
                    );
                    current.clone()
                }
            }
            None => current.clone(),
        };
        Arc::new(SimpleProperty {
            name: self.name.clone(),
            ty: self.ty.clone(),
            value: RwLock::new(value),
            clone_fn: self.clone_fn.clone(),
        })
    }
}

impl fmt::Debug for SimpleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleProperty")
            .field("name", &self.name)
            .field("type", &self.ty)
            .field("value", &*self.value.read())
            .finish()
    }
}
