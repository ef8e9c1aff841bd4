use rustc_hash::FxHashMap;

use super::{CloneContext, PropertyRef};

/// Ordered collection of properties keyed by name
///
/// Keys default to [`Property::name`](super::Property::name) but may differ
/// from it: a mapped view reports its source's name and is stored under a
/// key of its own with [`PropertySet::insert_as`].
///
/// `Clone` shares the underlying properties. Use [`PropertySet::deep_clone`]
/// for an independent copy.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    properties: Vec<PropertyRef>,
    keys: Vec<String>,
    indices: FxHashMap<String, usize>,
}

impl PropertySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, returning the one it replaced under the same name
    pub fn insert(&mut self, property: PropertyRef) -> Option<PropertyRef> {
        let key = property.name().to_string();
        self.insert_as(key, property)
    }

    /// Add a property under an explicit key
    pub fn insert_as(&mut self, key: impl Into<String>, property: PropertyRef) -> Option<PropertyRef> {
        let key = key.into();
        match self.indices.get(&key) {
            Some(&index) => Some(std::mem::replace(&mut self.properties[index], property)),
            None => {
                self.indices.insert(key.clone(), self.properties.len());
                self.keys.push(key);
                self.properties.push(property);
                None
            }
        }
    }

    /// Look up a property by name
    pub fn get(&self, name: &str) -> Option<&PropertyRef> {
        self.indices.get(name).map(|&index| &self.properties[index])
    }

    /// Whether a property with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Keys in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PropertyRef> {
        self.properties.iter()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Independent copy preserving links between member properties
    pub fn deep_clone(&self) -> PropertySet {
        let mut ctx = CloneContext::new();
        self.deep_clone_with(&mut ctx)
    }

    /// Independent copy through an existing context
    pub fn deep_clone_with(&self, ctx: &mut CloneContext) -> PropertySet {
        PropertySet {
            properties: self
                .properties
                .iter()
                .map(|p| ctx.clone_property(p))
                .collect(),
            keys: self.keys.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl FromIterator<PropertyRef> for PropertySet {
    fn from_iter<I: IntoIterator<Item = PropertyRef>>(iter: I) -> Self {
        let mut set = PropertySet::new();
        for property in iter {
            set.insert(property);
        }
        set
    }
}
