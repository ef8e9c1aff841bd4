//! Step-by-step property construction
//!
//! A [`PropertyBuilder`] collects a type, a name, an optional initial value
//! and an optional clone function. [`PropertyBuilder::confirm`] validates the
//! collected parts and freezes the builder: further setters fail and every
//! later confirmation returns the same property.

use std::sync::Arc;

use compkit_core::property::ValueFn;
use compkit_core::{PropertyRef, SimpleProperty, TypeTag, Value};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BuildError, BuildResult};

/// Identifier start followed by identifier parts
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}\p{Sc}\p{Pc}][\p{L}\p{Nl}\p{Sc}\p{Pc}\p{Mn}\p{Mc}\p{Nd}]*$")
        .expect("identifier pattern is valid")
});

/// Whether `name` can name a property, action or component type
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Builds one [`SimpleProperty`]
#[derive(Default)]
pub struct PropertyBuilder {
    ty: Option<TypeTag>,
    name: Option<String>,
    initial_value: Option<Value>,
    clone_fn: Option<ValueFn>,
    built: Option<PropertyRef>,
}

impl PropertyBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared type
    pub fn set_type(&mut self, ty: TypeTag) -> BuildResult<&mut Self> {
        self.check_unbuilt()?;
        self.ty = Some(ty);
        Ok(self)
    }

    /// Set the name
    ///
    /// Fails with [`BuildError::InvalidName`] unless `name` is an identifier.
    pub fn set_name(&mut self, name: impl Into<String>) -> BuildResult<&mut Self> {
        self.check_unbuilt()?;
        let name = name.into();
        if !is_identifier(&name) {
            return Err(BuildError::InvalidName(name));
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Set the value the property starts with
    ///
    /// Checked against the type on [`confirm`](Self::confirm); without one the
    /// property starts at its type's default value.
    pub fn set_initial_value(&mut self, value: Value) -> BuildResult<&mut Self> {
        self.check_unbuilt()?;
        self.initial_value = Some(value);
        Ok(self)
    }

    /// Set how values are copied when the property is cloned
    pub fn set_clone_fn(
        &mut self,
        f: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> BuildResult<&mut Self> {
        self.check_unbuilt()?;
        self.clone_fn = Some(Arc::new(f));
        Ok(self)
    }

    /// Whether [`confirm`](Self::confirm) has succeeded
    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// Build the property
    ///
    /// The first successful call freezes the builder; later calls return the
    /// same property.
    pub fn confirm(&mut self) -> BuildResult<PropertyRef> {
        if let Some(built) = &self.built {
            return Ok(built.clone());
        }

        let ty = self.ty.clone().ok_or(BuildError::MissingType)?;
        let name = self.name.clone().ok_or(BuildError::MissingName)?;
        let value = self
            .initial_value
            .clone()
            .unwrap_or_else(|| ty.default_value());
        let mut property = SimpleProperty::with_value(name.clone(), ty.clone(), value.clone())
            .map_err(|_| BuildError::invalid_initial_value(&name, &ty, value.type_tag()))?;
        if let Some(clone_fn) = self.clone_fn.clone() {
            property = property.with_clone_fn(move |v| clone_fn(v));
        }
        let property = property.into_ref();

        tracing::trace!(property = property.name(), ty = %property.type_tag(), "property built");
        self.built = Some(property.clone());
        Ok(property)
    }

    fn check_unbuilt(&self) -> BuildResult<()> {
        if self.built.is_some() {
            Err(BuildError::AlreadyBuilt)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for PropertyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyBuilder")
            .field("ty", &self.ty)
            .field("name", &self.name)
            .field("initial_value", &self.initial_value)
            .field("built", &self.built.is_some())
            .finish()
    }
}
