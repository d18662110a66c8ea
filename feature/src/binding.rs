//! Variable bindings accumulated during unification.

use crate::FeatureValue;
use std::collections::BTreeMap;

/// Values bound to variable names.
///
/// Bindings only ever hold simple values (symbolic or string).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBindings {
    map: BTreeMap<String, FeatureValue>,
}

impl VariableBindings {
    /// Create new empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create bindings with a single entry.
    pub fn with(name: impl Into<String>, value: FeatureValue) -> Self {
        let mut bindings = Self::new();
        bindings.insert(name, value);
        bindings
    }

    /// Bind or rebind a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.map.insert(name.into(), value);
    }

    /// Get the value bound to a variable.
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.map.get(name)
    }

    /// Check if a variable is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.map.iter()
    }

    pub fn into_map(self) -> BTreeMap<String, FeatureValue> {
        self.map
    }
}
