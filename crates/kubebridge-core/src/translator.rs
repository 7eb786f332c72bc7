//! Tool-call translation
//!
//! Turns a [`ToolCall`] into a [`CanonicalCommand`] in two steps:
//!
//! 1. [`Translator::validate`] checks the raw JSON arguments against the
//!    registered descriptor and produces a typed [`ValidatedCall`].
//! 2. [`Translator::translate`] maps the validated values onto the tool's
//!    command template.
//!
//! Translation is pure: the same name and arguments always yield the same
//! command, and nothing is executed here.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::registry::{Binding, ParamType, ParameterSpec, ToolAction, ToolDescriptor, ToolRegistry};
use crate::types::ToolCall;

/// Program every canonical command is addressed to
pub const PROGRAM: &str = "kubectl";

/// Errors raised while translating a tool call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required argument: {param}")]
    MissingArgument { param: String },

    #[error("Invalid value for {param}: {reason}")]
    ValidationError { param: String, reason: String },

    #[error("Tool {tool} does not map to a backend command")]
    NotExecutable { tool: String },
}

impl TranslateError {
    fn invalid(param: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/// A checked argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => write!(f, "{}", s),
            ArgValue::Integer(n) => write!(f, "{}", n),
            ArgValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A tool call whose arguments have been checked against its descriptor.
///
/// Only declared parameters that were present and non-empty are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCall {
    pub tool: String,
    pub values: BTreeMap<String, ArgValue>,
}

impl ValidatedCall {
    pub fn get(&self, param: &str) -> Option<&ArgValue> {
        self.values.get(param)
    }

    pub fn string(&self, param: &str) -> Option<&str> {
        match self.values.get(param) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Namespace scoping of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Namespace(String),
    AllNamespaces,
}

/// A `--name[=value]` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub value: Option<String>,
}

impl Flag {
    fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("--{}={}", self.name, value),
            None => format!("--{}", self.name),
        }
    }
}

/// Backend-agnostic representation of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCommand {
    pub program: String,
    pub verb: String,
    pub resource: String,
    pub target: Option<String>,
    pub scope: Option<Scope>,
    pub flags: Vec<Flag>,
}

impl CanonicalCommand {
    /// Argument vector, program first
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![self.program.clone(), self.verb.clone(), self.resource.clone()];
        if let Some(target) = &self.target {
            argv.push(target.clone());
        }
        argv.extend(self.flags.iter().map(Flag::render));
        match &self.scope {
            Some(Scope::Namespace(ns)) => {
                argv.push("-n".to_string());
                argv.push(ns.clone());
            }
            Some(Scope::AllNamespaces) => argv.push("--all-namespaces".to_string()),
            None => {}
        }
        argv
    }

    pub fn namespace(&self) -> Option<&str> {
        match &self.scope {
            Some(Scope::Namespace(ns)) => Some(ns),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Validates and translates tool calls against a registry
#[derive(Debug, Clone)]
pub struct Translator {
    registry: Arc<ToolRegistry>,
}

impl Translator {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Check arguments against the registered descriptor.
    ///
    /// Undeclared arguments are ignored.
    pub fn validate(&self, call: &ToolCall) -> TranslateResult<ValidatedCall> {
        let descriptor = self.descriptor(call)?;
        validate_against(descriptor, call)
    }

    /// Translate a tool call into a canonical command
    pub fn translate(&self, call: &ToolCall) -> TranslateResult<CanonicalCommand> {
        let descriptor = self.descriptor(call)?;
        let template = match &descriptor.action {
            ToolAction::Command(template) => template,
            ToolAction::Query => {
                return Err(TranslateError::NotExecutable {
                    tool: descriptor.name.clone(),
                })
            }
        };
        let validated = validate_against(descriptor, call)?;

        let mut command = CanonicalCommand {
            program: PROGRAM.to_string(),
            verb: template.verb.clone(),
            resource: template.resource.clone(),
            target: None,
            scope: None,
            flags: Vec::new(),
        };

        for spec in &descriptor.parameters {
            let Some(value) = validated.get(&spec.name) else {
                continue;
            };
            match (&spec.binding, value) {
                (Binding::Target, value) => command.target = Some(value.to_string()),
                (Binding::Namespace, value) => {
                    command.scope = Some(Scope::Namespace(value.to_string()))
                }
                (Binding::AllNamespaces, ArgValue::Boolean(true)) => {
                    if command.scope.is_none() {
                        command.scope = Some(Scope::AllNamespaces);
                    }
                }
                (Binding::AllNamespaces, _) => {}
                (Binding::Flag(name), ArgValue::Boolean(enabled)) => {
                    if *enabled {
                        command.flags.push(Flag {
                            name: name.clone(),
                            value: None,
                        });
                    }
                }
                (Binding::Flag(name), value) => command.flags.push(Flag {
                    name: name.clone(),
                    value: Some(value.to_string()),
                }),
            }
        }

        Ok(command)
    }

    fn descriptor(&self, call: &ToolCall) -> TranslateResult<&ToolDescriptor> {
        self.registry
            .get(&call.name)
            .map_err(|_| TranslateError::UnknownTool(call.name.clone()))
    }
}

fn validate_against(descriptor: &ToolDescriptor, call: &ToolCall) -> TranslateResult<ValidatedCall> {
    let mut values = BTreeMap::new();

    for spec in &descriptor.parameters {
        let raw = call.argument(&spec.name).filter(|v| !is_empty(v));
        match raw {
            Some(raw) => {
                values.insert(spec.name.clone(), coerce(spec, raw)?);
            }
            None if spec.required => {
                return Err(TranslateError::MissingArgument {
                    param: spec.name.clone(),
                })
            }
            None => {}
        }
    }

    Ok(ValidatedCall {
        tool: descriptor.name.clone(),
        values,
    })
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce(spec: &ParameterSpec, raw: &Value) -> TranslateResult<ArgValue> {
    let name = spec.name.as_str();
    match spec.param_type {
        ParamType::String => match raw {
            Value::String(s) => {
                let value = s.trim();
                match spec.binding {
                    Binding::Target => check_object_name(name, value, MAX_NAME_LEN)?,
                    Binding::Namespace => check_object_name(name, value, MAX_NAMESPACE_LEN)?,
                    _ => {}
                }
                Ok(ArgValue::String(value.to_string()))
            }
            other => Err(TranslateError::invalid(
                name,
                format!("expected a string, got {}", other),
            )),
        },
        ParamType::Boolean => match raw {
            Value::Bool(b) => Ok(ArgValue::Boolean(*b)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(ArgValue::Boolean(true)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => {
                Ok(ArgValue::Boolean(false))
            }
            other => Err(TranslateError::invalid(
                name,
                format!("expected a boolean, got {}", other),
            )),
        },
        ParamType::Integer => {
            let n = integer_value(name, raw)?;
            if let Some(minimum) = spec.minimum {
                let below = match raw.as_f64() {
                    Some(f) if raw.as_i64().is_none() => f < minimum as f64,
                    _ => n < minimum,
                };
                if below {
                    return Err(TranslateError::invalid(
                        name,
                        format!("must be at least {}, got {}", minimum, raw),
                    ));
                }
            }
            if n > i64::from(u32::MAX) {
                return Err(TranslateError::invalid(name, format!("{} is too large", n)));
            }
            Ok(ArgValue::Integer(n))
        }
    }
}

const MAX_NAME_LEN: usize = 253;
const MAX_NAMESPACE_LEN: usize = 63;

/// Object names and namespaces must be DNS-1123 style: lowercase
/// alphanumerics, `-` and `.`, starting and ending alphanumeric. Anything
/// else could be read by kubectl as a flag.
fn check_object_name(name: &str, value: &str, max_len: usize) -> TranslateResult<()> {
    let edge_ok = |c: Option<char>| c.map_or(false, |c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid = !value.is_empty()
        && value.len() <= max_len
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        && edge_ok(value.chars().next())
        && edge_ok(value.chars().last());
    if valid {
        Ok(())
    } else {
        Err(TranslateError::invalid(
            name,
            format!("'{}' is not a valid Kubernetes object name", value),
        ))
    }
}

fn integer_value(name: &str, raw: &Value) -> TranslateResult<i64> {
    match raw {
        Value::Number(num) => {
            if let Some(n) = num.as_i64() {
                return Ok(n);
            }
            match num.as_f64() {
                Some(f) if f.is_finite() && f.abs() < 9.0e15 => Ok(f.trunc() as i64),
                _ => Err(TranslateError::invalid(name, format!("{} is out of range", num))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| TranslateError::invalid(name, format!("'{}' is not an integer", s))),
        other => Err(TranslateError::invalid(
            name,
            format!("expected an integer, got {}", other),
        )),
    }
}
