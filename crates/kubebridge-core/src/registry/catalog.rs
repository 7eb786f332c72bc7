//! Built-in Kubernetes tool catalogue

use super::{Binding, ParameterSpec, RegistryResult, ToolDescriptor, ToolRegistry};

/// Name of the internal tool that hands free text to the assistant
pub const QUERY_TOOL: &str = "natural_language_query";

fn namespace() -> ParameterSpec {
    ParameterSpec::string("namespace", "Kubernetes namespace").bind(Binding::Namespace)
}

fn all_namespaces() -> ParameterSpec {
    ParameterSpec::boolean("all_namespaces", "Search across all namespaces")
        .bind(Binding::AllNamespaces)
}

fn target(description: &str) -> ParameterSpec {
    ParameterSpec::string("name", description)
        .required()
        .bind(Binding::Target)
}

fn list_tool(name: &str, resource: &str) -> ToolDescriptor {
    ToolDescriptor::command(
        name,
        format!("List {} in the cluster", resource),
        "get",
        resource,
    )
    .param(namespace())
    .param(all_namespaces())
}

/// The tools a model may call against a Kubernetes cluster, in advertising order
pub fn kubernetes_tools() -> Vec<ToolDescriptor> {
    vec![
        list_tool("get_pods", "pods"),
        list_tool("get_services", "services"),
        list_tool("get_deployments", "deployments"),
        ToolDescriptor::command(
            "create_deployment",
            "Create a new deployment from a container image",
            "create",
            "deployment",
        )
        .param(target("Name of the deployment"))
        .param(ParameterSpec::string("image", "Container image to deploy").required())
        .param(namespace())
        .param(ParameterSpec::integer("replicas", "Number of replicas").min(1)),
        ToolDescriptor::command(
            "scale_deployment",
            "Scale a deployment to the given number of replicas",
            "scale",
            "deployment",
        )
        .param(target("Name of the deployment"))
        .param(
            ParameterSpec::integer("replicas", "Desired number of replicas")
                .required()
                .min(0),
        )
        .param(namespace()),
        ToolDescriptor::command("delete_pod", "Delete a pod", "delete", "pod")
            .param(target("Name of the pod"))
            .param(namespace()),
        ToolDescriptor::command(
            "describe_pod",
            "Show detailed information about a pod",
            "describe",
            "pod",
        )
        .param(target("Name of the pod"))
        .param(namespace()),
    ]
}

/// Internal tool that runs a free-text query through the assistant
pub fn query_tool() -> ToolDescriptor {
    ToolDescriptor::query(
        QUERY_TOOL,
        "Answer a natural-language request about the cluster, running any tools it needs",
    )
    .param(ParameterSpec::string("query", "The request in plain language").required())
}

/// Registry holding the Kubernetes tools followed by the query tool
pub fn kubernetes_registry() -> RegistryResult<ToolRegistry> {
    ToolRegistry::from_descriptors(kubernetes_tools().into_iter().chain([query_tool()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolAction;

    #[test]
    fn test_catalog_builds_without_duplicates() {
        let registry = kubernetes_registry().unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.list()[0].name, "get_pods");
        assert_eq!(registry.list()[7].name, QUERY_TOOL);
    }

    #[test]
    fn test_query_tool_not_offered_to_models() {
        let registry = kubernetes_registry().unwrap();
        let names: Vec<String> = registry.model_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 7);
        assert!(!names.iter().any(|n| n == QUERY_TOOL));
    }

    #[test]
    fn test_every_command_tool_has_template() {
        for tool in kubernetes_tools() {
            assert!(
                matches!(tool.action, ToolAction::Command(_)),
                "{} should translate to a command",
                tool.name
            );
        }
    }

    #[test]
    fn test_scale_replicas_bounds() {
        let registry = kubernetes_registry().unwrap();
        let scale = registry.get("scale_deployment").unwrap();
        assert_eq!(scale.parameter("replicas").unwrap().minimum, Some(0));

        let create = registry.get("create_deployment").unwrap();
        let replicas = create.parameter("replicas").unwrap();
        assert_eq!(replicas.minimum, Some(1));
        assert!(!replicas.required);
    }
}
