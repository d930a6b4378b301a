//! Lookup of builtins by name.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::Builtin;

/// Registry of builtins.
#[derive(Default, Clone)]
pub struct BuiltinRegistry {
    builtins: HashMap<String, Arc<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builtin under its own name, replacing any previous one.
    pub fn register(&mut self, builtin: impl Builtin + 'static) {
        self.builtins.insert(builtin.name().to_string(), Arc::new(builtin));
    }

    /// Look up a builtin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Builtin>> {
        self.builtins.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
