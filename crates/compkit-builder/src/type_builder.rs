//! Runtime declaration of component types
//!
//! A [`TypeBuilder`] collects property, action and child declarations and
//! validates them as a whole in [`TypeBuilder::build`]:
//!
//! - every type and member name is an identifier
//! - property, action and child names are unique within their kind
//! - initial values are instances of their property's type
//! - a derived property's source is declared before it
//! - a derived property with an initial value can write back to its source

use std::fmt;
use std::sync::Arc;

use compkit_core::property::ValueFn;
use compkit_core::{ComponentRef, ListConfig, Parameter, PropertySet, TypeTag, Value};
use rustc_hash::FxHashSet;

use crate::dynamic::DynamicType;
use crate::error::{BuildError, BuildResult};
use crate::property_builder::is_identifier;

/// Body of a dynamic action: the instance's properties and resolved arguments
pub type ActionBody = Arc<dyn Fn(&PropertySet, &[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Link from a derived property to the property it views
#[derive(Clone)]
pub struct Derivation {
    /// Name of the source property
    pub source: String,
    /// Source value to derived value
    pub forward: ValueFn,
    /// Derived value to source value; `None` makes the property read-only
    pub backward: Option<ValueFn>,
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derivation")
            .field("source", &self.source)
            .field("writable", &self.backward.is_some())
            .finish()
    }
}

/// Definition for a property of a dynamic type
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    /// Property name
    pub name: String,
    /// Declared type
    pub type_tag: TypeTag,
    /// Initial value (if any)
    pub initial_value: Option<Value>,
    /// Whether writes are rejected
    pub is_readonly: bool,
    /// Source link for derived properties
    pub derivation: Option<Derivation>,
}

impl PropertyDefinition {
    /// Create a plain writable property definition
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            initial_value: None,
            is_readonly: false,
            derivation: None,
        }
    }

    /// Set the initial value
    ///
    /// On a derived property the value is written through to the source when
    /// an instance is created, so the derivation needs a backward converter.
    pub fn initial_value(mut self, value: Value) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Mark as readonly
    ///
    /// Initializers may still supply the starting value of a readonly
    /// property.
    pub fn as_readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    /// Derive this property from `source` through `forward`
    ///
    /// Without [`backward`](Self::backward) the derived property is read-only.
    pub fn derived_from(
        mut self,
        source: impl Into<String>,
        forward: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.derivation = Some(Derivation {
            source: source.into(),
            forward: Arc::new(forward),
            backward: None,
        });
        self
    }

    /// Make a derived property writable through `backward`
    ///
    /// Has no effect on a property that is not derived.
    pub fn backward(mut self, backward: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        if let Some(derivation) = &mut self.derivation {
            derivation.backward = Some(Arc::new(backward));
        }
        self
    }

    /// Whether this property views another one
    pub fn is_derived(&self) -> bool {
        self.derivation.is_some()
    }
}

/// One overload of a dynamic action
#[derive(Clone)]
pub struct PresetDefinition {
    /// Declared parameters in order
    pub parameters: Vec<Parameter>,
    /// Operation run with the instance's properties
    pub body: ActionBody,
}

impl fmt::Debug for PresetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetDefinition")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Definition for an action of a dynamic type
#[derive(Debug, Clone)]
pub struct ActionDefinition {
    /// Action name
    pub name: String,
    /// Declared return type
    pub return_type: TypeTag,
    /// Overloads in declaration order
    pub presets: Vec<PresetDefinition>,
}

impl ActionDefinition {
    /// Create an action definition returning nothing
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeTag::Void,
            presets: Vec::new(),
        }
    }

    /// Set return type
    pub fn returns(mut self, return_type: TypeTag) -> Self {
        self.return_type = return_type;
        self
    }

    /// Add an overload
    pub fn with_preset(
        mut self,
        parameters: Vec<Parameter>,
        body: impl Fn(&PropertySet, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.presets.push(PresetDefinition {
            parameters,
            body: Arc::new(body),
        });
        self
    }
}

/// Declares a component type at runtime
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    name: String,
    properties: Vec<PropertyDefinition>,
    actions: Vec<ActionDefinition>,
    children: Vec<(String, ComponentRef)>,
    list_config: ListConfig,
}

impl TypeBuilder {
    /// Start declaring a type named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            actions: Vec::new(),
            children: Vec::new(),
            list_config: ListConfig::default(),
        }
    }

    /// Add a property
    pub fn property(mut self, definition: PropertyDefinition) -> Self {
        self.properties.push(definition);
        self
    }

    /// Add an action
    pub fn action(mut self, definition: ActionDefinition) -> Self {
        self.actions.push(definition);
        self
    }

    /// Add a default child; every instance starts with its own clone
    pub fn child(mut self, name: impl Into<String>, component: ComponentRef) -> Self {
        self.children.push((name.into(), component));
        self
    }

    /// Settings for the child lists of instances
    pub fn list_config(mut self, config: ListConfig) -> Self {
        self.list_config = config;
        self
    }

    /// Validate the declarations and produce the type
    pub fn build(self) -> BuildResult<Arc<DynamicType>> {
        if !is_identifier(&self.name) {
            return Err(BuildError::InvalidName(self.name));
        }

        let mut declared = FxHashSet::default();
        for property in &self.properties {
            self.check_member("property", &property.name, &mut declared)?;
            if let Some(derivation) = &property.derivation {
                // `declared` holds exactly the properties seen so far
                if derivation.source == property.name || !declared.contains(&derivation.source) {
                    return Err(BuildError::UnknownSource {
                        property: property.name.clone(),
                        origin: derivation.source.clone(),
                    });
                }
            }
            if let Some(value) = &property.initial_value {
                let writable = property
                    .derivation
                    .as_ref()
                    .map_or(true, |d| d.backward.is_some());
                if !writable {
                    return Err(BuildError::UnwritableInitialValue(property.name.clone()));
                }
                if !property.type_tag.is_instance(value) {
                    return Err(BuildError::invalid_initial_value(
                        &property.name,
                        &property.type_tag,
                        value.type_tag(),
                    ));
                }
            }
        }

        let mut seen = FxHashSet::default();
        for action in &self.actions {
            self.check_member("action", &action.name, &mut seen)?;
        }

        let mut seen = FxHashSet::default();
        for (name, _) in &self.children {
            if !seen.insert(name.as_str()) {
                return Err(self.duplicate("child", name));
            }
        }

        tracing::debug!(
            ty = %self.name,
            properties = self.properties.len(),
            actions = self.actions.len(),
            children = self.children.len(),
            "type built"
        );
        Ok(Arc::new(DynamicType::from_parts(
            self.name,
            self.properties,
            self.actions,
            self.children,
            self.list_config,
        )))
    }

    fn check_member(
        &self,
        kind: &'static str,
        name: &str,
        seen: &mut FxHashSet<String>,
    ) -> BuildResult<()> {
        if !is_identifier(name) {
            return Err(BuildError::InvalidName(name.to_string()));
        }
        if !seen.insert(name.to_string()) {
            return Err(self.duplicate(kind, name));
        }
        Ok(())
    }

    fn duplicate(&self, kind: &'static str, member: &str) -> BuildError {
        BuildError::DuplicateMember {
            owner: self.name.clone(),
            kind,
            member: member.to_string(),
        }
    }
}
