use std::sync::Arc;

use compkit_types::Value;

use super::resolve::Bindings;
use super::Action;
use crate::error::ActionError;

/// Mutable argument accumulator for one action invocation
///
/// Binding methods mutate the context in place and return it for chaining:
///
/// ```ignore
/// let max = component.invoke("max")?
///     .with(Value::from(vec![3, 9, 4]))
///     .call()?;
/// ```
pub trait ActionContext: Send {
    /// Bind the parameter called `name`
    fn with_name(&mut self, name: &str, value: Value) -> &mut dyn ActionContext;

    /// Bind the parameter at position `index`
    fn with_index(&mut self, index: usize, value: Value) -> &mut dyn ActionContext;

    /// Append a positional argument
    fn with(&mut self, value: Value) -> &mut dyn ActionContext;

    /// Append several positional arguments in order
    fn with_all(&mut self, values: Vec<Value>) -> &mut dyn ActionContext;

    /// Resolve a preset, run it and return its result
    fn call(&self) -> Result<Value, ActionError>;
}

impl dyn ActionContext {
    /// Wrap this context so `f` is applied to the result of `call`
    ///
    /// Every binding call is forwarded to this context.
    pub fn map(
        self: Box<Self>,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Box<dyn ActionContext> {
        Box::new(MappedActionContext {
            inner: self,
            mapper: Arc::new(f),
        })
    }
}

/// Context bound to an action
pub(crate) struct BoundContext {
    action: Action,
    bindings: Bindings,
}

impl BoundContext {
    pub(crate) fn new(action: Action) -> Self {
        Self {
            action,
            bindings: Bindings::default(),
        }
    }
}

impl ActionContext for BoundContext {
    fn with_name(&mut self, name: &str, value: Value) -> &mut dyn ActionContext {
        self.bindings.bind_name(name, value);
        self
    }

    fn with_index(&mut self, index: usize, value: Value) -> &mut dyn ActionContext {
        self.bindings.bind_index(index, value);
        self
    }

    fn with(&mut self, value: Value) -> &mut dyn ActionContext {
        self.bindings.push(value);
        self
    }

    fn with_all(&mut self, values: Vec<Value>) -> &mut dyn ActionContext {
        for value in values {
            self.bindings.push(value);
        }
        self
    }

    fn call(&self) -> Result<Value, ActionError> {
        self.action.call_with(&self.bindings)
    }
}

/// Context that transforms the result of a wrapped context
pub struct MappedActionContext {
    inner: Box<dyn ActionContext>,
    mapper: Arc<dyn Fn(Value) -> Value + Send + Sync>,
}

impl ActionContext for MappedActionContext {
    fn with_name(&mut self, name: &str, value: Value) -> &mut dyn ActionContext {
        self.inner.with_name(name, value);
        self
    }

    fn with_index(&mut self, index: usize, value: Value) -> &mut dyn ActionContext {
        self.inner.with_index(index, value);
        self
    }

    fn with(&mut self, value: Value) -> &mut dyn ActionContext {
        self.inner.with(value);
        self
    }

    fn with_all(&mut self, values: Vec<Value>) -> &mut dyn ActionContext {
        self.inner.with_all(values);
        self
    }

    fn call(&self) -> Result<Value, ActionError> {
        self.inner.call().map(|value| (self.mapper)(value))
    }
}
