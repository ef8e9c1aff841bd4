use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::PropertyRef;

/// Memo table for cloning a group of linked properties
///
/// Cloning the same original twice through one context yields the same
/// clone, so a derived property cloned alongside its source links to the
/// source's clone rather than to a second, detached copy.
#[derive(Default)]
pub struct CloneContext {
    clones: FxHashMap<usize, PropertyRef>,
}

impl CloneContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone `property`, reusing an earlier clone of the same original
    pub fn clone_property(&mut self, property: &PropertyRef) -> PropertyRef {
        let key = Arc::as_ptr(property) as *const () as usize;
        if let Some(existing) = self.clones.get(&key) {
            return existing.clone();
        }
        let clone = property.clone_with(self);
        self.clones.insert(key, clone.clone());
        clone
    }

    /// Number of distinct originals cloned so far
    pub fn len(&self) -> usize {
        self.clones.len()
    }

    /// Whether nothing has been cloned yet
    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }
}
