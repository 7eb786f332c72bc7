//! Tool registry
//!
//! The registry is the single catalogue consulted both when advertising tools
//! to a model provider and when validating an incoming `callTool` request.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry (built once, shared as Arc)   │
//! │                                             │
//! │  - list()        -> protocol clients        │
//! │  - model_tools() -> providers (no internal) │
//! │  - get(name)     -> translator / router     │
//! └─────────────────────────────────────────────┘
//! ```

mod catalog;
mod descriptor;

use std::collections::HashMap;

use thiserror::Error;

pub use catalog::{kubernetes_registry, kubernetes_tools, query_tool, QUERY_TOOL};
pub use descriptor::{
    AdvertisedTool, Binding, CommandTemplate, ParamType, ParameterSpec, ToolAction, ToolDescriptor,
};

/// Errors raised by registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Ordered catalogue of tool descriptors
///
/// Mutated only through [`ToolRegistry::register`] while it is being built;
/// once wrapped in an `Arc` it is read concurrently without locking.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, failing on the first duplicate
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ToolDescriptor>,
    ) -> RegistryResult<Self> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a tool
    pub fn register(&mut self, descriptor: ToolDescriptor) -> RegistryResult<()> {
        if self.index.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateTool(descriptor.name));
        }
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// All descriptors in registration order
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Look up a descriptor by name
    pub fn get(&self, name: &str) -> RegistryResult<&ToolDescriptor> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Descriptors offered to model providers, in registration order
    pub fn model_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().filter(|t| !t.internal).cloned().collect()
    }

    /// Wire representation of every tool, in registration order
    pub fn advertised(&self) -> Vec<AdvertisedTool> {
        self.tools.iter().map(ToolDescriptor::advertise).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str) -> ToolDescriptor {
        ToolDescriptor::command(name, format!("{} tool", name), "get", "pods")
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("get_pods")).unwrap();

        assert_eq!(registry.get("get_pods").unwrap().name, "get_pods");
        assert_eq!(
            registry.get("missing"),
            Err(RegistryError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("get_pods")).unwrap();

        let err = registry.register(tool("get_pods")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("get_pods".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let names = ["zeta", "alpha", "mid"];
        let registry = ToolRegistry::from_descriptors(names.iter().map(|n| tool(n))).unwrap();

        let listed: Vec<&str> = registry.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(listed, names);
        // Stable across repeated calls
        let again: Vec<&str> = registry.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(listed, again);
    }

    #[test]
    fn test_model_tools_hide_internal() {
        let registry =
            ToolRegistry::from_descriptors([tool("get_pods"), tool("secret").internal()]).unwrap();

        let visible: Vec<String> = registry.model_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(visible, vec!["get_pods".to_string()]);
        assert_eq!(registry.advertised().len(), 2);
    }
}
