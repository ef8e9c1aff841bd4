//! Component types declared at runtime
//!
//! A [`DynamicType`] is the product of a [`TypeBuilder`](crate::TypeBuilder).
//! Its instances hold one property per declaration, bind action bodies to
//! their own properties on demand and start with clones of the declared
//! default children.

use std::collections::BTreeSet;
use std::sync::Arc;

use compkit_core::{
    Action, Component, ComponentError, ComponentList, ComponentRef, ComponentResult,
    ComponentType, ComponentTypeRef, Initializer, ListConfig, MappedProperty, Preset, PropertyExt,
    PropertyRef, PropertySet, SimpleProperty, Value,
};
use tracing::trace;

use crate::type_builder::{ActionDefinition, PropertyDefinition};

#[derive(Debug)]
struct TypeData {
    name: String,
    properties: Vec<PropertyDefinition>,
    actions: Vec<ActionDefinition>,
    children: Vec<(String, ComponentRef)>,
    list_config: ListConfig,
}

/// Component type backed by runtime declarations
///
/// Cloning is cheap; clones describe the same type.
#[derive(Debug, Clone)]
pub struct DynamicType {
    data: Arc<TypeData>,
}

impl DynamicType {
    pub(crate) fn from_parts(
        name: String,
        properties: Vec<PropertyDefinition>,
        actions: Vec<ActionDefinition>,
        children: Vec<(String, ComponentRef)>,
        list_config: ListConfig,
    ) -> Self {
        Self {
            data: Arc::new(TypeData {
                name,
                properties,
                actions,
                children,
                list_config,
            }),
        }
    }

    /// Declaration of the property `name`
    pub fn property_definition(&self, name: &str) -> Option<&PropertyDefinition> {
        self.data.properties.iter().find(|p| p.name == name)
    }

    /// Declaration of the action `name`
    pub fn action_definition(&self, name: &str) -> Option<&ActionDefinition> {
        self.data.actions.iter().find(|a| a.name == name)
    }

    /// Settings used for instances' child lists
    pub fn list_config(&self) -> ListConfig {
        self.data.list_config
    }

    /// Whether both handles describe the same declaration
    pub fn same_type(&self, other: &DynamicType) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// New instance with every property at its declared initial value
    pub fn instantiate(&self) -> ComponentResult<ComponentRef> {
        self.instantiate_with(&[])
    }

    fn instantiate_with(&self, values: &[(String, Value)]) -> ComponentResult<ComponentRef> {
        if let Some((name, _)) = values
            .iter()
            .find(|(name, _)| self.property_definition(name).is_none())
        {
            return Err(ComponentError::NoSuchProperty {
                component: self.data.name.clone(),
                property: name.clone(),
            });
        }

        let mut properties = PropertySet::new();
        for definition in &self.data.properties {
            // Later values for the same name win
            let supplied = values
                .iter()
                .rev()
                .find(|(name, _)| *name == definition.name)
                .map(|(_, value)| value.clone());
            let property = self.create_property(definition, &properties, supplied)?;
            properties.insert(property);
        }

        let children = ComponentList::with_config(self.data.list_config);
        for (name, child) in &self.data.children {
            children.add(name.clone(), child.clone_component())?;
        }

        trace!(ty = %self.data.name, supplied = values.len(), "instance created");
        Ok(Arc::new(DynamicComponent {
            ty: self.clone(),
            properties: Arc::new(properties),
            children,
        }))
    }

    fn create_property(
        &self,
        definition: &PropertyDefinition,
        existing: &PropertySet,
        supplied: Option<Value>,
    ) -> ComponentResult<PropertyRef> {
        let property = match &definition.derivation {
            None => {
                let value = supplied
                    .or_else(|| definition.initial_value.clone())
                    .unwrap_or_else(|| definition.type_tag.default_value());
                SimpleProperty::with_value(definition.name.clone(), definition.type_tag.clone(), value)?
                    .into_ref()
            }
            Some(derivation) => {
                let source = existing.get(&derivation.source).cloned().ok_or_else(|| {
                    ComponentError::NoSuchProperty {
                        component: self.data.name.clone(),
                        property: derivation.source.clone(),
                    }
                })?;
                let view = MappedProperty::new(
                    definition.type_tag.clone(),
                    source,
                    derivation.forward.clone(),
                    derivation.backward.clone(),
                )
                .named(definition.name.clone());
                let view: PropertyRef = Arc::new(view);
                // Written through to the source, overriding its own starting value
                if let Some(value) = supplied.or_else(|| definition.initial_value.clone()) {
                    view.set(value)?;
                }
                view
            }
        };

        Ok(if definition.is_readonly {
            property.as_read_only()
        } else {
            property
        })
    }
}

impl ComponentType for DynamicType {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn properties(&self) -> BTreeSet<String> {
        self.data.properties.iter().map(|p| p.name.clone()).collect()
    }

    fn actions(&self) -> BTreeSet<String> {
        self.data.actions.iter().map(|a| a.name.clone()).collect()
    }

    fn initialize(&self) -> Box<dyn Initializer> {
        Box::new(DynamicInitializer {
            ty: self.clone(),
            values: Vec::new(),
        })
    }
}

/// Collects starting values for a [`DynamicType`] instance
///
/// Unknown names and mistyped values are reported by
/// [`build`](Initializer::build).
pub struct DynamicInitializer {
    ty: DynamicType,
    values: Vec<(String, Value)>,
}

impl Initializer for DynamicInitializer {
    fn set(&mut self, name: &str, value: Value) -> &mut dyn Initializer {
        self.values.push((name.to_string(), value));
        self
    }

    fn build(&self) -> ComponentResult<ComponentRef> {
        self.ty.instantiate_with(&self.values)
    }
}

/// Instance of a [`DynamicType`]
#[derive(Debug)]
pub struct DynamicComponent {
    ty: DynamicType,
    properties: Arc<PropertySet>,
    children: ComponentList,
}

impl DynamicComponent {
    /// Type this component was created from
    pub fn dynamic_type(&self) -> &DynamicType {
        &self.ty
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    fn bind(&self, definition: &ActionDefinition) -> Action {
        let action = Action::new(
            self.ty.data.name.clone(),
            definition.name.clone(),
            definition.return_type.clone(),
        );
        definition.presets.iter().fold(action, |action, preset| {
            let properties = self.properties.clone();
            let body = preset.body.clone();
            action.with_preset(Preset::new(preset.parameters.clone(), move |args| {
                body(&properties, args)
            }))
        })
    }
}

impl Component for DynamicComponent {
    fn component_type(&self) -> ComponentTypeRef {
        Arc::new(self.ty.clone())
    }

    fn property(&self, name: &str) -> Option<PropertyRef> {
        self.properties.get(name).cloned()
    }

    fn action(&self, name: &str) -> Option<Action> {
        self.ty.action_definition(name).map(|def| self.bind(def))
    }

    fn children(&self) -> &ComponentList {
        &self.children
    }

    fn clone_component(&self) -> ComponentRef {
        Arc::new(DynamicComponent {
            ty: self.ty.clone(),
            properties: Arc::new(self.properties.deep_clone()),
            children: self.children.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionDefinition, PropertyDefinition, TypeBuilder};
    use compkit_core::{Parameter, PropertyError, TypeTag};

    fn counter() -> Arc<DynamicType> {
        TypeBuilder::new("Counter")
            .property(PropertyDefinition::new("count", TypeTag::Int))
            .property(
                PropertyDefinition::new("label", TypeTag::Str)
                    .derived_from("count", |v| Value::Str(format!("#{}", v)))
                    .backward(|v| {
                        let digits = v.as_str().unwrap_or("").trim_start_matches('#');
                        Value::Int(digits.parse().unwrap_or(0))
                    }),
            )
            .property(
                PropertyDefinition::new("step", TypeTag::Int)
                    .initial_value(Value::Int(1))
                    .as_readonly(),
            )
            .action(
                ActionDefinition::new("tick")
                    .returns(TypeTag::Int)
                    .with_preset(vec![], |props, _| tick(props, None))
                    .with_preset(vec![Parameter::new("by", TypeTag::Int)], |props, args| {
                        tick(props, args[0].as_int())
                    }),
            )
            .build()
            .unwrap()
    }

    fn tick(props: &PropertySet, by: Option<i64>) -> anyhow::Result<Value> {
        let count = props
            .get("count")
            .ok_or_else(|| anyhow::anyhow!("count is not declared"))?;
        let step = match by {
            Some(by) => by,
            None => props
                .get("step")
                .ok_or_else(|| anyhow::anyhow!("step is not declared"))?
                .get_as::<i64>()?,
        };
        let next = count.get_as::<i64>()? + step;
        count.set(Value::Int(next))?;
        Ok(Value::Int(next))
    }

    #[test]
    fn test_instantiate_uses_initial_values() {
        let c = counter().instantiate().unwrap();
        assert_eq!(c.get("count").unwrap(), Value::Int(0));
        assert_eq!(c.get("label").unwrap(), Value::from("#0"));
        assert_eq!(c.get("step").unwrap(), Value::Int(1));
        assert!(c.property("step").unwrap().is_read_only());
        assert!(c.property("missing").is_none());
    }

    #[test]
    fn test_initializer_sets_values() {
        let ty = counter();
        let c = ty
            .initialize()
            .set("count", Value::Int(3))
            .set("step", Value::Int(5))
            .build()
            .unwrap();
        assert_eq!(c.get("count").unwrap(), Value::Int(3));
        // Readonly properties accept a starting value
        assert_eq!(c.get("step").unwrap(), Value::Int(5));

        let c = ty.initialize().set("label", Value::from("#7")).build().unwrap();
        assert_eq!(c.get("count").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_initializer_rejects_bad_values() {
        let ty = counter();
        let err = ty.initialize().set("nope", Value::Int(1)).build().unwrap_err();
        assert!(matches!(err, ComponentError::NoSuchProperty { ref property, .. } if property == "nope"));

        let err = ty.initialize().set("count", Value::from("x")).build().unwrap_err();
        assert!(matches!(
            err,
            ComponentError::Property(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_derived_property_tracks_source() {
        let c = counter().instantiate().unwrap();
        c.set("count", Value::Int(4)).unwrap();
        assert_eq!(c.get("label").unwrap(), Value::from("#4"));

        c.set("label", Value::from("#9")).unwrap();
        assert_eq!(c.get("count").unwrap(), Value::Int(9));

        let err = c.set("step", Value::Int(2)).unwrap_err();
        assert_eq!(err.to_string(), "Property \"step\" is read-only");
    }

    #[test]
    fn test_derived_initial_value_writes_through() {
        let ty = TypeBuilder::new("Text")
            .property(PropertyDefinition::new("n", TypeTag::Int))
            .property(
                PropertyDefinition::new("s", TypeTag::Str)
                    .derived_from("n", |v| Value::from(v.as_int().unwrap_or(0).to_string()))
                    .backward(|v| Value::Int(v.as_str().and_then(|s| s.parse().ok()).unwrap_or(0)))
                    .initial_value(Value::from("5")),
            )
            .build()
            .unwrap();

        let c = ty.instantiate().unwrap();
        assert_eq!(c.get("s").unwrap(), Value::from("5"));
        assert_eq!(c.get("n").unwrap(), Value::Int(5));

        // A supplied value wins over the declared one
        let c = ty.initialize().set("s", Value::from("8")).build().unwrap();
        assert_eq!(c.get("n").unwrap(), Value::Int(8));
    }

    #[test]
    fn test_actions_bind_to_instance() {
        let c = counter().instantiate().unwrap();
        assert_eq!(c.invoke("tick").unwrap().call().unwrap(), Value::Int(1));
        let mut ctx = c.invoke("tick").unwrap();
        assert_eq!(ctx.with(Value::Int(10)).call().unwrap(), Value::Int(11));
        assert_eq!(c.get("label").unwrap(), Value::from("#11"));

        let action = c.action("tick").unwrap();
        assert_eq!(action.owner(), "Counter");
        assert_eq!(action.presets().len(), 2);
    }

    #[test]
    fn test_clone_rebinds_actions_and_links() {
        let original = counter().instantiate().unwrap();
        original.set("count", Value::Int(2)).unwrap();
        let copy = original.clone_component();

        copy.invoke("tick").unwrap().call().unwrap();
        copy.set("label", Value::from("#40")).unwrap();

        assert_eq!(original.get("count").unwrap(), Value::Int(2));
        assert_eq!(original.get("label").unwrap(), Value::from("#2"));
        assert_eq!(copy.get("count").unwrap(), Value::Int(40));
        assert_eq!(copy.component_type().name(), "Counter");
    }

    #[test]
    fn test_default_children_are_cloned_per_instance() {
        let leaf = TypeBuilder::new("Leaf")
            .property(PropertyDefinition::new("n", TypeTag::Int))
            .build()
            .unwrap();
        let tree = TypeBuilder::new("Tree")
            .child("first", leaf.instantiate().unwrap())
            .list_config(ListConfig::uncached())
            .build()
            .unwrap();

        let a = tree.instantiate().unwrap();
        let b = tree.instantiate().unwrap();
        a.children().get_by_name("first").unwrap().set("n", Value::Int(1)).unwrap();

        assert_eq!(
            b.children().get_by_name("first").unwrap().get("n").unwrap(),
            Value::Int(0)
        );
        assert!(!a.children().config().name_cache);
    }

    #[test]
    fn test_type_handles() {
        let ty = counter();
        let c = ty.instantiate().unwrap();
        assert!(ty.is_instance(c.as_ref()));
        assert!(ty.same_type(&ty.as_ref().clone()));
        assert!(ty.property_definition("label").unwrap().is_derived());
        assert!(ty.action_definition("tick").is_some());
        assert!(ty.action_definition("count").is_none());
    }
}
