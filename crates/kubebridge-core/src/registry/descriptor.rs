//! Tool descriptors: the declarative schema of each callable operation

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
}

impl ParamType {
    /// JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }
}

/// Where a parameter's value lands in the canonical command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// The object the verb acts on (e.g., the deployment name)
    Target,
    /// Namespace scoping
    Namespace,
    /// Boolean switch for cluster-wide scope
    AllNamespaces,
    /// A `--flag=value` option
    Flag(String),
}

/// One parameter of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
    pub binding: Binding,
    /// Inclusive lower bound for integer parameters
    pub minimum: Option<i64>,
}

impl ParameterSpec {
    fn new(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            binding: Binding::Flag(name.clone()),
            name,
            param_type,
            description: description.into(),
            required: false,
            minimum: None,
        }
    }

    /// An optional string parameter bound to `--<name>=`
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::String, description)
    }

    /// An optional integer parameter bound to `--<name>=`
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Integer, description)
    }

    /// An optional boolean parameter bound to `--<name>`
    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Boolean, description)
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Change where the value lands in the command
    pub fn bind(mut self, binding: Binding) -> Self {
        self.binding = binding;
        self
    }

    /// Set an inclusive lower bound (integers only)
    pub fn min(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(self.param_type.as_str()));
        property.insert("description".to_string(), json!(self.description));
        if let Some(minimum) = self.minimum {
            property.insert("minimum".to_string(), json!(minimum));
        }
        Value::Object(property)
    }
}

/// Verb and resource kind of a backend command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub verb: String,
    pub resource: String,
}

/// What invoking a tool does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAction {
    /// Translate into a canonical backend command
    Command(CommandTemplate),
    /// Hand the query text to the attached assistant
    Query,
}

/// Declarative schema of a callable operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    /// Internal tools are served to protocol clients but never shown to a model
    pub internal: bool,
    pub action: ToolAction,
}

impl ToolDescriptor {
    /// Create a tool that translates into `<verb> <resource>`
    pub fn command(
        name: impl Into<String>,
        description: impl Into<String>,
        verb: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            internal: false,
            action: ToolAction::Command(CommandTemplate {
                verb: verb.into(),
                resource: resource.into(),
            }),
        }
    }

    /// Create a tool served by the assistant
    pub fn query(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            internal: true,
            action: ToolAction::Query,
        }
    }

    /// Append a parameter
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Hide the tool from model providers
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// JSON Schema object describing the parameters
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }

        Value::Object(schema)
    }

    /// Wire representation used in `listTools` responses
    pub fn advertise(&self) -> AdvertisedTool {
        AdvertisedTool {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema(),
        }
    }
}

/// A tool as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisedTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
