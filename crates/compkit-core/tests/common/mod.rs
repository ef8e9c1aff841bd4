//! Hand-written components used by the integration tests
//!
//! `Panel` is written the way generated code would be: one field per
//! property, actions bound to those fields, and a type descriptor with an
//! initializer. `Record` is a generic field bag used as a mapping target.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use compkit_core::{
    Action, Component, ComponentList, ComponentRef, ComponentResult,
    ComponentType, ComponentTypeRef, Initializer, Mapper, Parameter, Preset, PropertyExt,
    PropertyRef, PropertySet, SimpleProperty, TypeTag, Value,
};

/// Descriptor of [`Panel`]
#[derive(Debug)]
pub struct PanelType;

impl ComponentType for PanelType {
    fn name(&self) -> &str {
        "Panel"
    }

    fn properties(&self) -> BTreeSet<String> {
        ["title", "width", "height", "size"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn actions(&self) -> BTreeSet<String> {
        ["area", "resize", "max"].into_iter().map(String::from).collect()
    }

    fn initialize(&self) -> Box<dyn Initializer> {
        Box::new(PanelInitializer::default())
    }
}

#[derive(Default)]
struct PanelInitializer {
    values: Vec<(String, Value)>,
}

impl Initializer for PanelInitializer {
    fn set(&mut self, name: &str, value: Value) -> &mut dyn Initializer {
        self.values.push((name.to_string(), value));
        self
    }

    fn build(&self) -> ComponentResult<ComponentRef> {
        let panel = Panel::new("", 0, 0);
        for (name, value) in &self.values {
            panel.set(name, value.clone())?;
        }
        Ok(panel as ComponentRef)
    }
}

/// Rectangle with a title, a derived size label and child panels
#[derive(Debug)]
pub struct Panel {
    title: PropertyRef,
    width: PropertyRef,
    height: PropertyRef,
    size: PropertyRef,
    children: ComponentList,
}

impl Panel {
    pub fn new(title: &str, width: i64, height: i64) -> Arc<Panel> {
        let title = SimpleProperty::with_value("title", TypeTag::Str, Value::from(title))
            .expect("title is a string")
            .into_ref();
        let width = SimpleProperty::with_value("width", TypeTag::Int, Value::Int(width))
            .expect("width is an int")
            .into_ref();
        let height = SimpleProperty::with_value("height", TypeTag::Int, Value::Int(height))
            .expect("height is an int")
            .into_ref();
        Arc::new(Self::assemble(title, width, height, ComponentList::new()))
    }

    fn assemble(
        title: PropertyRef,
        width: PropertyRef,
        height: PropertyRef,
        children: ComponentList,
    ) -> Panel {
        let size = Arc::new(SizeLabel {
            ty: TypeTag::Str,
            width: width.clone(),
            height: height.clone(),
        }) as PropertyRef;
        Panel {
            title,
            width,
            height,
            size,
            children,
        }
    }

    pub fn with_children(self: Arc<Self>, children: Vec<(&str, ComponentRef)>) -> ComponentRef {
        for (name, child) in children {
            self.children.add(name, child).expect("unique child names");
        }
        self
    }
}

/// Custom property combining two sources into a `WxH` string
#[derive(Debug)]
struct SizeLabel {
    ty: TypeTag,
    width: PropertyRef,
    height: PropertyRef,
}

impl compkit_core::Property for SizeLabel {
    fn type_tag(&self) -> &TypeTag {
        &self.ty
    }

    fn name(&self) -> &str {
        "size"
    }

    fn get(&self) -> Value {
        Value::from(format!("{}x{}", self.width.get(), self.height.get()))
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn set(&self, _value: Value) -> Result<(), compkit_core::PropertyError> {
        Err(compkit_core::PropertyError::ReadOnly {
            property: "size".to_string(),
        })
    }

    fn clone_with(&self, ctx: &mut compkit_core::CloneContext) -> PropertyRef {
        Arc::new(SizeLabel {
            ty: self.ty.clone(),
            width: ctx.clone_property(&self.width),
            height: ctx.clone_property(&self.height),
        })
    }
}

impl Component for Panel {
    fn component_type(&self) -> ComponentTypeRef {
        Arc::new(PanelType)
    }

    fn property(&self, name: &str) -> Option<PropertyRef> {
        match name {
            "title" => Some(self.title.clone()),
            "width" => Some(self.width.clone()),
            "height" => Some(self.height.clone()),
            "size" => Some(self.size.clone()),
            _ => None,
        }
    }

    fn action(&self, name: &str) -> Option<Action> {
        match name {
            "area" => {
                let (w, h) = (self.width.clone(), self.height.clone());
                Some(
                    Action::new("Panel", "area", TypeTag::Int).with_preset(Preset::new(
                        vec![],
                        move |_| Ok(Value::Int(w.get_as::<i64>()? * h.get_as::<i64>()?)),
                    )),
                )
            }
            "resize" => {
                let (w, h) = (self.width.clone(), self.height.clone());
                Some(
                    Action::new("Panel", "resize", TypeTag::Void).with_preset(Preset::new(
                        vec![
                            Parameter::new("width", TypeTag::Int)
                                .with_validator(|v| v.as_int().is_some_and(|n| n >= 0)),
                            Parameter::new("height", TypeTag::Int)
                                .with_default(|prev| prev[0].clone()),
                        ],
                        move |args| {
                            w.set(args[0].clone())?;
                            h.set(args[1].clone())?;
                            Ok(Value::Null)
                        },
                    )),
                )
            }
            "max" => Some(max_action("Panel")),
            _ => None,
        }
    }

    fn children(&self) -> &ComponentList {
        &self.children
    }

    fn clone_component(&self) -> ComponentRef {
        let mut ctx = compkit_core::CloneContext::new();
        Arc::new(Panel {
            title: ctx.clone_property(&self.title),
            width: ctx.clone_property(&self.width),
            height: ctx.clone_property(&self.height),
            size: ctx.clone_property(&self.size),
            children: self.children.clone(),
        })
    }

    fn mapper_for(&self, target: &ComponentTypeRef) -> Option<Mapper> {
        if target.name() != "Summary" {
            return None;
        }
        let summary = target.clone();
        Some(Mapper::new(Arc::new(PanelType), target.clone(), move |source| {
            let text = format!(
                "{} ({})",
                source.get_as::<String>("title")?,
                source.get_as::<String>("size")?
            );
            let mut init = summary.initialize();
            init.set("text", Value::from(text));
            init.build()
        }))
    }
}

/// `max(values: int[])` and `max(values: int[], off = 0, len = rest)`
pub fn max_action(owner: &str) -> Action {
    fn max_of(values: &[Value]) -> anyhow::Result<Value> {
        values
            .iter()
            .filter_map(Value::as_int)
            .max()
            .map(Value::Int)
            .ok_or_else(|| anyhow::anyhow!("max of an empty range"))
    }

    Action::new(owner, "max", TypeTag::Int)
        .with_preset(Preset::new(
            vec![Parameter::new("values", TypeTag::array(TypeTag::Int))],
            |args| max_of(args[0].as_array().unwrap_or_default()),
        ))
        .with_preset(Preset::new(
            vec![
                Parameter::new("values", TypeTag::array(TypeTag::Int)),
                Parameter::new("off", TypeTag::Int).with_default_value(Value::Int(0)),
                Parameter::new("len", TypeTag::Int).with_default(|prev| {
                    let total = prev[0].as_array().map_or(0, |a| a.len() as i64);
                    Value::Int(total - prev[1].as_int().unwrap_or(0))
                }),
            ],
            |args| {
                let values = args[0].as_array().unwrap_or_default();
                let off = usize::try_from(args[1].as_int().unwrap_or(-1))?;
                let len = usize::try_from(args[2].as_int().unwrap_or(-1))?;
                let window = values
                    .get(off..off + len)
                    .ok_or_else(|| anyhow::anyhow!("window {off}..{} out of range", off + len))?;
                max_of(window)
            },
        ))
}

/// Generic type whose instances are bags of simple properties
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    fields: Vec<(String, TypeTag, Value)>,
}

impl RecordType {
    pub fn new(name: &str, fields: &[(&str, TypeTag, Value)]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(n, t, v)| (n.to_string(), t.clone(), v.clone()))
                .collect(),
        })
    }
}

impl ComponentType for RecordType {
    fn name(&self) -> &str {
        &self.name
    }

    fn properties(&self) -> BTreeSet<String> {
        self.fields.iter().map(|(n, _, _)| n.clone()).collect()
    }

    fn actions(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn initialize(&self) -> Box<dyn Initializer> {
        Box::new(RecordInitializer {
            ty: self.clone(),
            values: Vec::new(),
        })
    }
}

struct RecordInitializer {
    ty: RecordType,
    values: Vec<(String, Value)>,
}

impl Initializer for RecordInitializer {
    fn set(&mut self, name: &str, value: Value) -> &mut dyn Initializer {
        self.values.push((name.to_string(), value));
        self
    }

    fn build(&self) -> ComponentResult<ComponentRef> {
        let mut properties = PropertySet::new();
        for (name, ty, default) in &self.ty.fields {
            properties.insert(
                SimpleProperty::with_value(name.as_str(), ty.clone(), default.clone())?.into_ref(),
            );
        }
        let record = Record {
            ty: self.ty.clone(),
            properties,
            children: ComponentList::new(),
        };
        for (name, value) in &self.values {
            record.set(name, value.clone())?;
        }
        Ok(Arc::new(record))
    }
}

#[derive(Debug)]
pub struct Record {
    ty: RecordType,
    properties: PropertySet,
    children: ComponentList,
}

impl Component for Record {
    fn component_type(&self) -> ComponentTypeRef {
        Arc::new(self.ty.clone())
    }

    fn property(&self, name: &str) -> Option<PropertyRef> {
        self.properties.get(name).cloned()
    }

    fn action(&self, _name: &str) -> Option<Action> {
        None
    }

    fn children(&self) -> &ComponentList {
        &self.children
    }

    fn clone_component(&self) -> ComponentRef {
        Arc::new(Record {
            ty: self.ty.clone(),
            properties: self.properties.deep_clone(),
            children: self.children.clone(),
        })
    }
}

/// Shorthand for a fresh panel behind a component handle
pub fn panel(title: &str, width: i64, height: i64) -> ComponentRef {
    Panel::new(title, width, height)
}

/// Unwrap for test setup where failure means a broken fixture
pub fn must<T>(result: ComponentResult<T>) -> T {
    result.unwrap_or_else(|e| panic!("fixture error: {e}"))
}
