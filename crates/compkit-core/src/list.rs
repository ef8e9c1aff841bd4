//! Ordered, uniquely named child collection
//!
//! The entry sequence is the source of truth for order and membership. A
//! name set mirrors it for fast membership checks, and a weak name → entry
//! cache accelerates repeated lookups by name.
//!
//! Locking: mutators hold the sequence lock exclusively and invalidate the
//! cache before releasing it; readers hold it shared. The cache lock is only
//! ever taken while the sequence lock is held, never the other way round.
//! No component code runs while either lock is held.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::component::{Component, ComponentRef};
use crate::component_type::ComponentType;
use crate::config::ListConfig;
use crate::error::ListError;

struct Entry {
    name: String,
    component: ComponentRef,
}

#[derive(Default)]
struct Inner {
    names: BTreeSet<String>,
    entries: Vec<Arc<Entry>>,
}

impl Inner {
    fn position(&self, name: &str) -> Option<usize> {
        if !self.names.contains(name) {
            return None;
        }
        self.entries.iter().position(|e| e.name == name)
    }

    fn check_index(&self, index: usize) -> Result<(), ListError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(ListError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

/// Children of a component
pub struct ComponentList {
    inner: RwLock<Inner>,
    cache: Mutex<FxHashMap<String, Weak<Entry>>>,
    config: ListConfig,
}

impl ComponentList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    /// Create an empty list with explicit cache settings
    pub fn with_config(config: ListConfig) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            cache: Mutex::new(FxHashMap::default()),
            config,
        }
    }

    /// Build a list from named components
    ///
    /// Fails on the first repeated name without producing a list.
    pub fn from_entries<N, I>(entries: I) -> Result<Self, ListError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, ComponentRef)>,
    {
        Self::from_entries_with_config(ListConfig::default(), entries)
    }

    /// Build a list from named components with explicit cache settings
    pub fn from_entries_with_config<N, I>(config: ListConfig, entries: I) -> Result<Self, ListError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, ComponentRef)>,
    {
        let list = Self::with_config(config);
        {
            let mut inner = list.inner.write();
            for (name, component) in entries {
                let name = name.into();
                if !inner.names.insert(name.clone()) {
                    return Err(ListError::DuplicateName(name));
                }
                inner.entries.push(Arc::new(Entry { name, component }));
            }
        }
        Ok(list)
    }

    /// Build a list naming each component with `name_of`
    pub fn from_components<I>(
        components: I,
        name_of: impl Fn(&dyn Component) -> String,
    ) -> Result<Self, ListError>
    where
        I: IntoIterator<Item = ComponentRef>,
    {
        Self::from_entries(components.into_iter().map(|c| (name_of(c.as_ref()), c)))
    }

    /// Cache settings of this list
    pub fn config(&self) -> ListConfig {
        self.config
    }

    /// Copy of the current name set
    pub fn names(&self) -> BTreeSet<String> {
        self.inner.read().names.clone()
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Whether the list has no children
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Whether a child with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().names.contains(name)
    }

    /// Child at `index`
    pub fn get(&self, index: usize) -> Result<ComponentRef, ListError> {
        let inner = self.inner.read();
        inner.check_index(index)?;
        Ok(inner.entries[index].component.clone())
    }

    /// Child called `name`
    pub fn get_by_name(&self, name: &str) -> Result<ComponentRef, ListError> {
        let inner = self.inner.read();
        if let Some(entry) = self.cached(name) {
            trace!(name, "name cache hit");
            return Ok(entry.component.clone());
        }
        let index = inner
            .position(name)
            .ok_or_else(|| ListError::NotFound(name.to_string()))?;
        let entry = &inner.entries[index];
        self.remember(entry);
        Ok(entry.component.clone())
    }

    /// Every child that is an instance of `ty`, in sequence order
    pub fn get_all_of(&self, ty: &dyn ComponentType) -> Vec<ComponentRef> {
        self.iter().filter(|c| ty.is_instance(c.as_ref())).collect()
    }

    /// Append a child
    ///
    /// Fails without modifying the list if `name` is already taken.
    pub fn add(&self, name: impl Into<String>, component: ComponentRef) -> Result<(), ListError> {
        let name = name.into();
        let mut inner = self.inner.write();
        if inner.names.contains(&name) {
            return Err(ListError::DuplicateName(name));
        }
        trace!(name = %name, index = inner.entries.len(), "child added");
        inner.names.insert(name.clone());
        inner.entries.push(Arc::new(Entry { name, component }));
        Ok(())
    }

    /// Swap the component of an existing child in place
    ///
    /// Returns the previous component.
    pub fn replace(&self, name: &str, component: ComponentRef) -> Result<ComponentRef, ListError> {
        let mut inner = self.inner.write();
        let index = inner
            .position(name)
            .ok_or_else(|| ListError::NotFound(name.to_string()))?;
        let old = self.swap(&mut inner, index, component);
        trace!(name, index, "child replaced");
        Ok(old)
    }

    /// Swap the component at `index`, keeping its name
    ///
    /// Returns the previous component.
    pub fn set(&self, index: usize, component: ComponentRef) -> Result<ComponentRef, ListError> {
        let mut inner = self.inner.write();
        inner.check_index(index)?;
        let old = self.swap(&mut inner, index, component);
        trace!(index, "child set");
        Ok(old)
    }

    /// Remove the child at `index`
    pub fn remove_at(&self, index: usize) -> Result<ComponentRef, ListError> {
        let mut inner = self.inner.write();
        inner.check_index(index)?;
        Ok(self.take(&mut inner, index))
    }

    /// Remove the child called `name`, if present
    pub fn remove(&self, name: &str) -> Option<ComponentRef> {
        let mut inner = self.inner.write();
        let index = inner.position(name)?;
        Some(self.take(&mut inner, index))
    }

    /// Remove every child
    pub fn clear(&self) {
        let removed = {
            let mut inner = self.inner.write();
            inner.names.clear();
            self.cache.lock().clear();
            std::mem::take(&mut inner.entries)
        };
        // Children are dropped outside the lock
        trace!(count = removed.len(), "children cleared");
    }

    /// Snapshot of the children in sequence order
    pub fn iter(&self) -> std::vec::IntoIter<ComponentRef> {
        let inner = self.inner.read();
        inner
            .entries
            .iter()
            .map(|e| e.component.clone())
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Snapshot of `(name, component)` pairs in sequence order
    pub fn entries(&self) -> Vec<(String, ComponentRef)> {
        let inner = self.inner.read();
        inner
            .entries
            .iter()
            .map(|e| (e.name.clone(), e.component.clone()))
            .collect()
    }

    fn swap(&self, inner: &mut Inner, index: usize, component: ComponentRef) -> ComponentRef {
        let name = inner.entries[index].name.clone();
        self.cache.lock().remove(&name);
        let old = std::mem::replace(&mut inner.entries[index], Arc::new(Entry { name, component }));
        old.component.clone()
    }

    fn take(&self, inner: &mut Inner, index: usize) -> ComponentRef {
        let entry = inner.entries.remove(index);
        inner.names.remove(&entry.name);
        self.cache.lock().remove(&entry.name);
        trace!(name = %entry.name, index, "child removed");
        entry.component.clone()
    }

    fn cached(&self, name: &str) -> Option<Arc<Entry>> {
        if !self.config.name_cache {
            return None;
        }
        self.cache.lock().get(name).and_then(Weak::upgrade)
    }

    fn remember(&self, entry: &Arc<Entry>) {
        if !self.config.name_cache || self.config.cache_capacity == 0 {
            return;
        }
        let mut cache = self.cache.lock();
        if cache.len() >= self.config.cache_capacity {
            trace!(size = cache.len(), "name cache dropped");
            cache.clear();
        }
        trace!(name = %entry.name, "name cache miss");
        cache.insert(entry.name.clone(), Arc::downgrade(entry));
    }
}

impl Default for ComponentList {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: every child is cloned and the copy starts with an empty cache
impl Clone for ComponentList {
    fn clone(&self) -> Self {
        let entries: Vec<Arc<Entry>> = self
            .entries()
            .into_iter()
            .map(|(name, component)| {
                Arc::new(Entry {
                    name,
                    component: component.clone_component(),
                })
            })
            .collect();
        let names = entries.iter().map(|e| e.name.clone()).collect();
        Self {
            inner: RwLock::new(Inner { names, entries }),
            cache: Mutex::new(FxHashMap::default()),
            config: self.config,
        }
    }
}

impl fmt::Debug for ComponentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_list()
            .entries(inner.entries.iter().map(|e| &e.name))
            .finish()
    }
}
