//! Named facilities for configuration files and Spel component references

use crate::engine::builtins::Builtins;
use crate::engine::namespace::Facility;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Resolves `@name` component references in Spel expressions
pub trait ComponentResolver: Send + Sync + fmt::Debug {
    fn component(&self, name: &str) -> Option<Arc<dyn Facility>>;
}

/// Facilities addressable by name
///
/// Namespace targets in a declarations file are looked up here, and the same
/// catalog serves as the component resolver for Spel. A fresh catalog holds
/// one entry, `builtins`.
#[derive(Debug, Clone)]
pub struct FacilityCatalog {
    entries: BTreeMap<String, Arc<dyn Facility>>,
}

impl FacilityCatalog {
    pub fn new() -> Self {
        let mut catalog = Self {
            entries: BTreeMap::new(),
        };
        catalog.register("builtins", Arc::new(Builtins));
        catalog
    }

    /// Adds or replaces a facility
    pub fn register(&mut self, name: impl Into<String>, facility: Arc<dyn Facility>) -> &mut Self {
        self.entries.insert(name.into(), facility);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Facility>> {
        self.entries.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for FacilityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentResolver for FacilityCatalog {
    fn component(&self, name: &str) -> Option<Arc<dyn Facility>> {
        self.get(name)
    }
}
