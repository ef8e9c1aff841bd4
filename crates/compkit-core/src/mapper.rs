//! Conversion between component types
//!
//! The default mapper collects every target property whose source
//! counterpart has the same name and an assignable type, and hands the
//! source values to the target's initializer. Values go through the
//! initializer rather than through `set`, so read-only target properties
//! receive them too. Everything else keeps the value given by the target's
//! initializer.

use std::fmt;
use std::sync::Arc;

use compkit_types::Value;
use tracing::trace;

use crate::component::{Component, ComponentRef};
use crate::component_type::ComponentTypeRef;
use crate::error::ComponentResult;

/// Conversion function from a source component to a new target component
pub type Transform = Arc<dyn Fn(&dyn Component) -> ComponentResult<ComponentRef> + Send + Sync>;

/// Converts components of one type into components of another
#[derive(Clone)]
pub struct Mapper {
    from: ComponentTypeRef,
    to: ComponentTypeRef,
    transform: Transform,
}

impl Mapper {
    /// Create a mapper from a conversion function
    pub fn new(
        from: ComponentTypeRef,
        to: ComponentTypeRef,
        transform: impl Fn(&dyn Component) -> ComponentResult<ComponentRef> + Send + Sync + 'static,
    ) -> Self {
        Self {
            from,
            to,
            transform: Arc::new(transform),
        }
    }

    /// Structural mapper copying same-named, type-compatible properties
    pub fn default_mapper(from: ComponentTypeRef, to: ComponentTypeRef) -> Self {
        let target_type = to.clone();
        Self::new(from, to, move |source| {
            let template = target_type.initialize().build()?;
            let values = transferable(source, template.as_ref(), &target_type);
            build_with(&target_type, &values)
        })
    }

    /// Source type
    pub fn from_type(&self) -> &ComponentTypeRef {
        &self.from
    }

    /// Target type
    pub fn to_type(&self) -> &ComponentTypeRef {
        &self.to
    }

    /// Run the conversion without checking the source type
    pub fn apply(&self, component: &dyn Component) -> ComponentResult<ComponentRef> {
        (self.transform)(component)
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("from", &self.from.name())
            .field("to", &self.to.name())
            .finish()
    }
}

/// Source values the target type can take, keyed by property name
///
/// `template` is a default target instance used to learn the declared type
/// of each target property.
fn transferable(
    source: &dyn Component,
    template: &dyn Component,
    target_type: &ComponentTypeRef,
) -> Vec<(String, Value)> {
    let mut values = Vec::new();
    for name in target_type.properties() {
        let (Some(from), Some(to)) = (source.property(&name), template.property(&name)) else {
            trace!(property = %name, "mapper skipped: missing on one side");
            continue;
        };
        if !to.type_tag().is_assignable_from(from.type_tag()) {
            trace!(
                property = %name,
                from = %from.type_tag(),
                to = %to.type_tag(),
                "mapper skipped: incompatible types"
            );
            continue;
        }
        let value = from.get();
        // A derived source may produce values outside its declared type
        if !to.type_tag().is_instance(&value) {
            trace!(
                property = %name,
                actual = %value.type_tag(),
                "mapper skipped: source value is not an instance of the target type"
            );
            continue;
        }
        values.push((name, value));
    }
    values
}

/// Build a target from `values`, dropping the ones its initializer rejects
fn build_with(
    target_type: &ComponentTypeRef,
    values: &[(String, Value)],
) -> ComponentResult<ComponentRef> {
    match initialize_with(target_type, values) {
        Ok(target) => {
            trace!(copied = values.len(), "mapper copied all values");
            return Ok(target);
        }
        Err(e) => trace!(error = %e, "mapper initializer rejected values, retrying one by one"),
    }

    let mut accepted: Vec<(String, Value)> = Vec::with_capacity(values.len());
    for (name, value) in values {
        accepted.push((name.clone(), value.clone()));
        match initialize_with(target_type, &accepted) {
            Ok(_) => trace!(property = %name, "mapper copied"),
            Err(e) => {
                trace!(property = %name, error = %e, "mapper skipped: rejected by initializer");
                accepted.pop();
            }
        }
    }
    initialize_with(target_type, &accepted)
}

fn initialize_with(
    target_type: &ComponentTypeRef,
    values: &[(String, Value)],
) -> ComponentResult<ComponentRef> {
    let mut init = target_type.initialize();
    for (name, value) in values {
        init.set(name, value.clone());
    }
    init.build()
}
