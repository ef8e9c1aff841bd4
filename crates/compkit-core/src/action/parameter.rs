use std::fmt;
use std::sync::Arc;

use compkit_types::{TypeTag, Value};

/// Predicate restricting the values a parameter accepts
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Computes a default from the values bound to preceding parameters
pub type DefaultFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Declared input of an action preset
#[derive(Clone)]
pub struct Parameter {
    name: String,
    ty: TypeTag,
    required: bool,
    validator: Option<Validator>,
    default: Option<DefaultFn>,
}

impl Parameter {
    /// Required parameter accepting any instance of `ty`
    pub fn new(name: impl Into<String>, ty: TypeTag) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            validator: None,
            default: None,
        }
    }

    /// Allow the parameter to be left unbound
    ///
    /// Without a default function, an unbound optional parameter receives
    /// the default value of its type.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Make the parameter optional, defaulting to `f(preceding values)`
    pub fn with_default(mut self, f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        self.required = false;
        self.default = Some(Arc::new(f));
        self
    }

    /// Make the parameter optional with a constant default
    pub fn with_default_value(self, value: Value) -> Self {
        self.with_default(move |_| value.clone())
    }

    /// Restrict accepted values with a predicate
    pub fn with_validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(f));
        self
    }

    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn type_tag(&self) -> &TypeTag {
        &self.ty
    }

    /// Whether the parameter must be bound
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether `value` is an instance of the declared type and passes the validator
    pub fn is_valid(&self, value: &Value) -> bool {
        self.ty.is_instance(value) && self.validator.as_ref().map_or(true, |f| f(value))
    }

    /// Value used when the parameter is left unbound
    ///
    /// `preceding` holds the resolved values of the parameters declared
    /// before this one.
    pub fn default_value(&self, preceding: &[Value]) -> Value {
        match &self.default {
            Some(f) => f(preceding),
            None => self.ty.default_value(),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("type", &self.ty)
            .field("required", &self.required)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "{}: {}", self.name, self.ty)
        } else {
            write!(f, "{}?: {}", self.name, self.ty)
        }
    }
}
