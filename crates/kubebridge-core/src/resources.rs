//! Resource catalogue addressed by `<domain>://<kind>` URIs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while resolving a resource URI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Malformed resource URI '{0}': expected <domain>://<kind>")]
    Malformed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Parsed `<domain>://<kind>` address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    pub domain: String,
    pub kind: String,
}

impl FromStr for ResourceUri {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ResourceError::Malformed(s.to_string());
        let (domain, kind) = s.split_once("://").ok_or_else(malformed)?;

        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        };
        if !valid(domain) || !valid(kind) {
            return Err(malformed());
        }

        Ok(Self {
            domain: domain.to_string(),
            kind: kind.to_string(),
        })
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.domain, self.kind)
    }
}

/// A readable resource as advertised in `listResources`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Ordered set of resources the router can read
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    entries: Vec<(ResourceUri, ResourceDescriptor)>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pods, services, deployments and nodes of a Kubernetes cluster
    pub fn kubernetes() -> Self {
        let mut catalog = Self::new();
        for (kind, name, description) in [
            ("pods", "Pods", "Pods in the current namespace"),
            ("services", "Services", "Services in the current namespace"),
            ("deployments", "Deployments", "Deployments in the current namespace"),
            ("nodes", "Nodes", "Nodes of the cluster"),
        ] {
            catalog.insert(ResourceUri {
                domain: "kubernetes".to_string(),
                kind: kind.to_string(),
            }, name, description);
        }
        catalog
    }

    /// Add a resource; a repeated URI replaces the earlier description in place
    pub fn insert(&mut self, uri: ResourceUri, name: &str, description: &str) {
        let descriptor = ResourceDescriptor {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: "application/json".to_string(),
        };
        match self.entries.iter_mut().find(|(u, _)| *u == uri) {
            Some(entry) => entry.1 = descriptor,
            None => self.entries.push((uri, descriptor)),
        }
    }

    /// Descriptors in insertion order
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        self.entries.iter().map(|(_, d)| d.clone()).collect()
    }

    /// Parse and look up a URI
    pub fn resolve(&self, uri: &str) -> Result<(ResourceUri, &ResourceDescriptor), ResourceError> {
        let parsed: ResourceUri = uri.parse()?;
        self.entries
            .iter()
            .find(|(u, _)| *u == parsed)
            .map(|(u, d)| (u.clone(), d))
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uri() {
        let uri: ResourceUri = "kubernetes://pods".parse().unwrap();
        assert_eq!(uri.domain, "kubernetes");
        assert_eq!(uri.kind, "pods");
        assert_eq!(uri.to_string(), "kubernetes://pods");
    }

    #[test]
    fn test_malformed_uris() {
        for bad in ["pods", "kubernetes://", "://pods", "kubernetes://pods/extra", ""] {
            assert!(
                matches!(bad.parse::<ResourceUri>(), Err(ResourceError::Malformed(_))),
                "{} should be malformed",
                bad
            );
        }
    }

    #[test]
    fn test_kubernetes_catalog_order() {
        let uris: Vec<String> = ResourceCatalog::kubernetes()
            .list()
            .into_iter()
            .map(|d| d.uri)
            .collect();
        assert_eq!(
            uris,
            vec![
                "kubernetes://pods",
                "kubernetes://services",
                "kubernetes://deployments",
                "kubernetes://nodes"
            ]
        );
    }

    #[test]
    fn test_resolve() {
        let catalog = ResourceCatalog::kubernetes();
        let (uri, descriptor) = catalog.resolve("kubernetes://nodes").unwrap();
        assert_eq!(uri.kind, "nodes");
        assert_eq!(descriptor.name, "Nodes");

        assert_eq!(
            catalog.resolve("kind://widgets").unwrap_err(),
            ResourceError::NotFound("kind://widgets".to_string())
        );
        assert!(matches!(
            catalog.resolve("widgets").unwrap_err(),
            ResourceError::Malformed(_)
        ));
    }
}
