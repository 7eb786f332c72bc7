//! Backend collaborators that carry out canonical commands
//!
//! The router hands every translated command to a [`Backend`] exactly once
//! and never retries. Two implementations ship here:
//!
//! - [`DryRunBackend`] renders the command without running anything.
//! - [`KubectlBackend`] runs it with a local `kubectl` binary.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::process::Command;

use crate::resources::ResourceUri;
use crate::translator::CanonicalCommand;
use crate::types::ToolResult;

/// Output beyond this many bytes is cut before it reaches the caller
const MAX_OUTPUT: usize = 30_000;

/// Errors raised by a backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exit code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("{0}")]
    Other(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Executor of canonical commands
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Run one command
    async fn execute(&self, command: &CanonicalCommand) -> BackendResult<ToolResult>;

    /// Fetch the current content of a resource
    async fn read_resource(&self, uri: &ResourceUri) -> BackendResult<Value>;
}

/// Backend that only renders commands
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunBackend;

#[async_trait]
impl Backend for DryRunBackend {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn execute(&self, command: &CanonicalCommand) -> BackendResult<ToolResult> {
        Ok(ToolResult::text(format!("(dry run) {}", command)))
    }

    async fn read_resource(&self, uri: &ResourceUri) -> BackendResult<Value> {
        Ok(json!({
            "dryRun": true,
            "command": format!("kubectl get {} -o json", uri.kind),
            "items": [],
        }))
    }
}

/// Backend that runs commands with a kubectl binary
#[derive(Debug, Clone)]
pub struct KubectlBackend {
    binary: String,
}

impl Default for KubectlBackend {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl KubectlBackend {
    /// Use a specific binary in place of `kubectl`
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> BackendResult<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BackendError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackendError::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: truncate(String::from_utf8_lossy(&output.stderr).trim().to_string()),
            });
        }

        Ok(truncate(String::from_utf8_lossy(&output.stdout).to_string()))
    }
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_OUTPUT {
        let total = text.len();
        let mut cut = MAX_OUTPUT;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str(&format!("\n[truncated, {} bytes total]", total));
    }
    text
}

#[async_trait]
impl Backend for KubectlBackend {
    fn name(&self) -> &str {
        "kubectl"
    }

    async fn execute(&self, command: &CanonicalCommand) -> BackendResult<ToolResult> {
        // argv[0] is the program name; the configured binary stands in for it
        let argv = command.argv();
        let stdout = self.run(&argv[1..]).await?;
        Ok(ToolResult::text(stdout))
    }

    async fn read_resource(&self, uri: &ResourceUri) -> BackendResult<Value> {
        let args = vec![
            "get".to_string(),
            uri.kind.clone(),
            "-o".to_string(),
            "json".to_string(),
        ];
        let stdout = self.run(&args).await?;
        Ok(serde_json::from_str(&stdout).unwrap_or(Value::String(stdout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::Flag;

    fn scale_command() -> CanonicalCommand {
        CanonicalCommand {
            program: "kubectl".into(),
            verb: "scale".into(),
            resource: "deployment".into(),
            target: Some("api".into()),
            scope: None,
            flags: vec![Flag {
                name: "replicas".into(),
                value: Some("3".into()),
            }],
        }
    }

    #[tokio::test]
    async fn test_dry_run_renders_command() {
        let result = DryRunBackend.execute(&scale_command()).await.unwrap();
        assert_eq!(
            result.joined_text(),
            "(dry run) kubectl scale deployment api --replicas=3"
        );
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_dry_run_resource() {
        let uri: ResourceUri = "kubernetes://pods".parse().unwrap();
        let content = DryRunBackend.read_resource(&uri).await.unwrap();
        assert_eq!(content["command"], "kubectl get pods -o json");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_kubectl_backend_passes_argv() {
        // `echo` prints the arguments it would have given kubectl
        let backend = KubectlBackend::new("echo");
        let result = backend.execute(&scale_command()).await.unwrap();
        assert_eq!(result.joined_text().trim(), "scale deployment api --replicas=3");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_kubectl_backend_failure() {
        let backend = KubectlBackend::new("false");
        let err = backend.execute(&scale_command()).await.unwrap_err();
        assert!(matches!(err, BackendError::CommandFailed { code: 1, .. }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let backend = KubectlBackend::new("kubebridge-no-such-binary");
        let err = backend.execute(&scale_command()).await.unwrap_err();
        assert!(matches!(err, BackendError::Spawn { .. }));
    }

    #[test]
    fn test_truncate_long_output() {
        let text = truncate("x".repeat(MAX_OUTPUT + 10));
        assert!(text.contains("[truncated"));
        assert!(text.len() < MAX_OUTPUT + 100);
    }
}
