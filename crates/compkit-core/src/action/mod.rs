//! Actions
//!
//! An [`Action`] groups one or more [`Preset`]s (overloads) under one name
//! and return type. Invocation goes through an [`ActionContext`] that
//! accumulates arguments and resolves the best matching preset on `call`.

mod context;
mod parameter;
mod resolve;

use std::fmt;
use std::sync::Arc;

use compkit_types::{TypeError, TypeTag, Value};
use tracing::debug;

use crate::error::ActionError;

pub use context::{ActionContext, MappedActionContext};
pub use parameter::{DefaultFn, Parameter, Validator};

use context::BoundContext;
use resolve::Bindings;

/// Operation run by a preset with its fully resolved arguments
pub type Invocation = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// One overload of an action
#[derive(Clone)]
pub struct Preset {
    parameters: Vec<Parameter>,
    invocation: Invocation,
}

impl Preset {
    /// Create a preset from its parameter list and operation
    pub fn new(
        parameters: Vec<Parameter>,
        invocation: impl Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            parameters,
            invocation: Arc::new(invocation),
        }
    }

    /// Declared parameters in order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl fmt::Debug for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preset")
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[derive(Clone)]
struct ActionInner {
    owner: String,
    name: String,
    return_type: TypeTag,
    presets: Vec<Preset>,
}

/// Named, overloaded operation of a component
///
/// Cloning is cheap and shares the presets.
#[derive(Clone)]
pub struct Action {
    inner: Arc<ActionInner>,
}

impl Action {
    /// Create an action with no presets
    ///
    /// `owner` is the type name of the component the action belongs to and
    /// appears in failures.
    pub fn new(owner: impl Into<String>, name: impl Into<String>, return_type: TypeTag) -> Self {
        Self {
            inner: Arc::new(ActionInner {
                owner: owner.into(),
                name: name.into(),
                return_type,
                presets: Vec::new(),
            }),
        }
    }

    /// Add a preset
    pub fn with_preset(mut self, preset: Preset) -> Self {
        Arc::make_mut(&mut self.inner).presets.push(preset);
        self
    }

    /// Action name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Type name of the owning component
    pub fn owner(&self) -> &str {
        &self.inner.owner
    }

    /// Declared return type shared by every preset
    pub fn return_type(&self) -> &TypeTag {
        &self.inner.return_type
    }

    /// All presets in declaration order
    pub fn presets(&self) -> &[Preset] {
        &self.inner.presets
    }

    /// Parameters of the first preset
    pub fn parameters(&self) -> &[Parameter] {
        self.inner
            .presets
            .first()
            .map(Preset::parameters)
            .unwrap_or(&[])
    }

    /// Number of parameters of the first preset
    pub fn parameter_count(&self) -> usize {
        self.parameters().len()
    }

    /// Same presets, reported under a different owner
    pub fn with_owner(&self, owner: impl Into<String>) -> Action {
        let mut inner = (*self.inner).clone();
        inner.owner = owner.into();
        Action {
            inner: Arc::new(inner),
        }
    }

    /// Fresh context with no bound arguments
    pub fn create_context(&self) -> Box<dyn ActionContext> {
        Box::new(BoundContext::new(self.clone()))
    }

    /// Bind `args` positionally and call
    pub fn perform(&self, args: Vec<Value>) -> Result<Value, ActionError> {
        let mut ctx = self.create_context();
        ctx.with_all(args);
        ctx.call()
    }

    pub(crate) fn call_with(&self, bindings: &Bindings) -> Result<Value, ActionError> {
        let inner = &self.inner;
        let resolution =
            resolve::select(&inner.presets, bindings).map_err(|reason| ActionError::Unresolved {
                component: inner.owner.clone(),
                action: inner.name.clone(),
                reason,
            })?;
        debug!(
            component = %inner.owner,
            action = %inner.name,
            preset = resolution.preset,
            "preset selected"
        );

        let preset = &inner.presets[resolution.preset];
        let value = (preset.invocation)(&resolution.args).map_err(|e| {
            debug!(component = %inner.owner, action = %inner.name, error = %e, "action failed");
            self.failed(e.into())
        })?;

        if !inner.return_type.is_instance(&value) {
            debug!(
                component = %inner.owner,
                action = %inner.name,
                returned = %value.type_tag(),
                "action returned a value of the wrong type"
            );
            return Err(self.failed(Box::new(TypeError::mismatch(
                inner.return_type.clone(),
                value.type_tag(),
            ))));
        }
        Ok(value)
    }

    fn failed(&self, source: crate::error::BoxError) -> ActionError {
        ActionError::Failed {
            component: self.inner.owner.clone(),
            action: self.inner.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("owner", &self.inner.owner)
            .field("name", &self.inner.name)
            .field("return_type", &self.inner.return_type)
            .field("presets", &self.inner.presets.len())
            .finish()
    }
}
