//! Minimal component implementation for unit tests

use std::collections::BTreeSet;
use std::sync::Arc;

use compkit_types::{TypeTag, Value};

use crate::action::{Action, Parameter, Preset};
use crate::component::{Component, ComponentRef};
use crate::component_type::{ComponentType, ComponentTypeRef, Initializer};
use crate::error::{ComponentError, ComponentResult};
use crate::list::ComponentList;
use crate::property::{PropertyRef, PropertySet, SimpleProperty};

/// Type whose instances hold one simple property per declared field
#[derive(Debug, Clone)]
pub(crate) struct NodeType {
    name: String,
    fields: Vec<(String, TypeTag, Value)>,
    echo: bool,
}

impl NodeType {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            echo: false,
        }
    }

    pub(crate) fn field(mut self, name: &str, ty: TypeTag, default: Value) -> Self {
        self.fields.push((name.to_string(), ty, default));
        self
    }

    /// Declare an `echo(value: any) -> any` action
    pub(crate) fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    pub(crate) fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn instantiate(&self, values: &[(String, Value)]) -> ComponentResult<Node> {
        let mut properties = PropertySet::new();
        for (name, ty, default) in &self.fields {
            properties.insert(SimpleProperty::with_value(name.as_str(), ty.clone(), default.clone())?.into_ref());
        }
        for (name, value) in values {
            let property = properties
                .get(name)
                .ok_or_else(|| ComponentError::NoSuchProperty {
                    component: self.name.clone(),
                    property: name.clone(),
                })?;
            property.set(value.clone())?;
        }
        Ok(Node {
            ty: self.clone(),
            properties,
            children: ComponentList::new(),
        })
    }
}

impl ComponentType for NodeType {
    fn name(&self) -> &str {
        &self.name
    }

    fn properties(&self) -> BTreeSet<String> {
        self.fields.iter().map(|(name, _, _)| name.clone()).collect()
    }

    fn actions(&self) -> BTreeSet<String> {
        if self.echo {
            BTreeSet::from(["echo".to_string()])
        } else {
            BTreeSet::new()
        }
    }

    fn initialize(&self) -> Box<dyn Initializer> {
        Box::new(NodeInitializer {
            ty: self.clone(),
            values: Vec::new(),
        })
    }
}

struct NodeInitializer {
    ty: NodeType,
    values: Vec<(String, Value)>,
}

impl Initializer for NodeInitializer {
    fn set(&mut self, name: &str, value: Value) -> &mut dyn Initializer {
        self.values.push((name.to_string(), value));
        self
    }

    fn build(&self) -> ComponentResult<ComponentRef> {
        Ok(Arc::new(self.ty.instantiate(&self.values)?))
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    ty: NodeType,
    properties: PropertySet,
    children: ComponentList,
}

impl Component for Node {
    fn component_type(&self) -> ComponentTypeRef {
        Arc::new(self.ty.clone())
    }

    fn property(&self, name: &str) -> Option<PropertyRef> {
        self.properties.get(name).cloned()
    }

    fn action(&self, name: &str) -> Option<Action> {
        if !(self.ty.echo && name == "echo") {
            return None;
        }
        let action = Action::new(self.ty.name.as_str(), "echo", TypeTag::Any).with_preset(
            Preset::new(vec![Parameter::new("value", TypeTag::Any)], |args| {
                Ok(args[0].clone())
            }),
        );
        Some(action)
    }

    fn children(&self) -> &ComponentList {
        &self.children
    }

    fn clone_component(&self) -> ComponentRef {
        Arc::new(Node {
            ty: self.ty.clone(),
            properties: self.properties.deep_clone(),
            children: self.children.clone(),
        })
    }
}

/// Fresh instance of `ty` holding its declared defaults
pub(crate) fn node(ty: &NodeType) -> ComponentRef {
    match ty.instantiate(&[]) {
        Ok(node) => Arc::new(node),
        Err(e) => panic!("invalid test type {}: {e}", ty.name),
    }
}

/// Instance of a `Label` type with `text` set
pub(crate) fn labeled(text: &str) -> ComponentRef {
    let ty = NodeType::new("Label").field("text", TypeTag::Str, Value::from(text));
    node(&ty)
}
