//! Operation bridge
//!
//! Binds each tool to exactly one [`ClusterOps`] verb and turns the outcome
//! into a single text payload. Failures never leave this module as Rust
//! errors: they become [`InvocationResult::Failure`] text.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use kube_ops::{ClusterOps, ClusterResult, Deployment, PodSummary};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{BridgeError, Operation};
use crate::request::{ToolCall, ToolRequest};

/// Namespace every tool except `list_pods` works in
pub const DEFAULT_NAMESPACE: &str = "default";

/// How many log lines `get_pod_logs` returns
pub const LOG_TAIL_LINES: i64 = 30;

/// Outcome of one tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success(String),
    Failure(String),
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            InvocationResult::Success(text) | InvocationResult::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            InvocationResult::Success(text) | InvocationResult::Failure(text) => text,
        }
    }
}

impl From<Result<String, BridgeError>> for InvocationResult {
    fn from(result: Result<String, BridgeError>) -> Self {
        match result {
            Ok(text) => InvocationResult::Success(text),
            Err(err) => InvocationResult::Failure(err.to_string()),
        }
    }
}

/// Dispatches tool calls to the cluster
#[derive(Clone)]
pub struct ToolBridge {
    ops: Arc<dyn ClusterOps>,
    kubeconfig: PathBuf,
}

impl ToolBridge {
    /// `kubeconfig` is re-read by `cluster_name` on every call
    pub fn new(ops: Arc<dyn ClusterOps>, kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            ops,
            kubeconfig: kubeconfig.into(),
        }
    }

    /// Run one call to completion
    pub async fn invoke(&self, call: &ToolCall, cancel: &CancellationToken) -> InvocationResult {
        let result = match ToolRequest::decode(call) {
            Ok(request) => {
                tracing::debug!(tool = request.tool_name(), "Dispatching tool call");
                self.dispatch(request, cancel).await
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            tracing::warn!(tool = %call.name, "Tool call failed: {}", err);
        }
        result.into()
    }

    async fn dispatch(&self, request: ToolRequest, cancel: &CancellationToken) -> Result<String, BridgeError> {
        let tool = request.tool_name();
        match request {
            ToolRequest::ListPods { namespace } => {
                let pods = self
                    .call(tool, cancel, Operation::ListPods, self.ops.list_pods(&namespace))
                    .await?;
                Ok(format_pod_list(&pods))
            }
            ToolRequest::GetPod { name } => {
                let pod = self
                    .call(tool, cancel, Operation::GetPod, self.ops.get_pod(&name, DEFAULT_NAMESPACE))
                    .await?;
                to_text("pod", &pod)
            }
            ToolRequest::GetDeployment { name } => {
                let deployment = self
                    .call(
                        tool,
                        cancel,
                        Operation::GetDeployment,
                        self.ops.get_deployment(&name, DEFAULT_NAMESPACE),
                    )
                    .await?;
                to_text("deployment", &deployment)
            }
            ToolRequest::CreateDeployment { name, manifest } => {
                let deployment = parse_manifest(&name, &manifest)?;
                let created = self
                    .call(
                        tool,
                        cancel,
                        Operation::CreateDeployment,
                        self.ops.create_deployment(DEFAULT_NAMESPACE, &deployment),
                    )
                    .await?;
                to_text("deployment", &created)
            }
            ToolRequest::PatchDeployment { name, patch } => {
                let patched = self
                    .call(
                        tool,
                        cancel,
                        Operation::PatchDeployment,
                        self.ops.patch_deployment(&name, DEFAULT_NAMESPACE, &patch),
                    )
                    .await?;
                to_text("deployment", &patched)
            }
            ToolRequest::GetPodLogs { name } => {
                self.call(
                    tool,
                    cancel,
                    Operation::GetPodLogs,
                    self.ops.get_pod_logs(&name, DEFAULT_NAMESPACE, LOG_TAIL_LINES),
                )
                .await
            }
            ToolRequest::ClusterName => {
                let cluster = self
                    .call(
                        tool,
                        cancel,
                        Operation::ClusterName,
                        self.ops.current_cluster_name(&self.kubeconfig),
                    )
                    .await?;
                Ok(format!("Cluster name: {}", cluster))
            }
        }
    }

    /// Await a collaborator call unless the request is cancelled first
    async fn call<T>(
        &self,
        tool: &str,
        cancel: &CancellationToken,
        operation: Operation,
        fut: impl Future<Output = ClusterResult<T>>,
    ) -> Result<T, BridgeError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BridgeError::Cancelled(tool.to_string())),
            result = fut => result.map_err(BridgeError::cluster(operation)),
        }
    }
}

/// Count line followed by one line per pod, in the order given
pub fn format_pod_list(pods: &[PodSummary]) -> String {
    let mut message = format!("Total number of Pods: {}\n", pods.len());
    for pod in pods {
        let created = pod
            .created
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| "<unknown>".to_string());
        message.push_str(&format!(
            "Pod name: {}, status: {}, created: {}\n",
            pod.name, pod.phase, created
        ));
    }
    message
}

fn to_text<T: Serialize>(kind: &'static str, value: &T) -> Result<String, BridgeError> {
    serde_json::to_string(value).map_err(BridgeError::serialization(kind))
}

/// Parse a JSON or YAML manifest and check it names the requested deployment
fn parse_manifest(name: &str, manifest: &str) -> Result<Deployment, BridgeError> {
    if manifest.trim().is_empty() {
        return Err(BridgeError::InvalidManifest("manifest is empty".to_string()));
    }

    let deployment: Deployment = if manifest.trim_start().starts_with('{') {
        serde_json::from_str(manifest).map_err(|e| BridgeError::InvalidManifest(e.to_string()))?
    } else {
        serde_yaml::from_str(manifest).map_err(|e| BridgeError::InvalidManifest(e.to_string()))?
    };

    let manifest_name = match deployment.metadata.name.as_deref() {
        Some(manifest_name) if !manifest_name.is_empty() => manifest_name,
        _ => {
            return Err(BridgeError::InvalidManifest(
                "manifest has no metadata.name".to_string(),
            ))
        }
    };
    if manifest_name != name {
        return Err(BridgeError::NameMismatch {
            manifest: manifest_name.to_string(),
            requested: name.to_string(),
        });
    }

    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_empty_pod_list() {
        assert_eq!(format_pod_list(&[]), "Total number of Pods: 0\n");
    }

    #[test]
    fn test_format_pod_list() {
        let pods = vec![
            PodSummary {
                name: "web-1".to_string(),
                phase: "Running".to_string(),
                created: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()),
            },
            PodSummary {
                name: "web-0".to_string(),
                phase: "Pending".to_string(),
                created: None,
            },
        ];

        assert_eq!(
            format_pod_list(&pods),
            "Total number of Pods: 2\n\
             Pod name: web-1, status: Running, created: 2024-03-01T08:30:00+00:00\n\
             Pod name: web-0, status: Pending, created: <unknown>\n"
        );
    }

    #[test]
    fn test_parse_json_manifest() {
        let manifest = r#"{
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "web" },
            "spec": {
                "selector": { "matchLabels": { "app": "web" } },
                "template": { "metadata": { "labels": { "app": "web" } } }
            }
        }"#;

        let deployment = parse_manifest("web", manifest).unwrap();
        assert_eq!(deployment.metadata.name.as_deref(), Some("web"));
    }

    #[test]
    fn test_parse_yaml_manifest() {
        let manifest = "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n";
        let deployment = parse_manifest("web", manifest).unwrap();
        assert_eq!(deployment.metadata.name.as_deref(), Some("web"));
    }

    #[test]
    fn test_parse_manifest_name_mismatch() {
        let manifest = r#"{"apiVersion":"apps/v1","kind":"Deployment","metadata":{"name":"b"}}"#;
        match parse_manifest("a", manifest) {
            Err(BridgeError::NameMismatch { manifest, requested }) => {
                assert_eq!(manifest, "b");
                assert_eq!(requested, "a");
            }
            other => panic!("expected NameMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_manifest_garbage() {
        let err = parse_manifest("web", "{ not json").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidManifest(_)));
        assert!(err.to_string().starts_with("Error creating deployment: invalid manifest: "));
    }

    #[test]
    fn test_parse_blank_manifest() {
        for manifest in ["", "   ", "\n\t\n"] {
            let err = parse_manifest("", manifest).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Error creating deployment: invalid manifest: manifest is empty"
            );
        }
    }

    #[test]
    fn test_parse_manifest_without_name() {
        for manifest in ["{}", r#"{"metadata":{"name":""}}"#, "kind: Deployment\n"] {
            let err = parse_manifest("", manifest).unwrap_err();
            assert!(matches!(err, BridgeError::InvalidManifest(_)), "{}", manifest);
            assert!(err.to_string().ends_with("manifest has no metadata.name"));
        }
    }

    #[test]
    fn test_invocation_result_from() {
        let ok = InvocationResult::from(Ok("done".to_string()));
        assert!(ok.is_success());
        assert_eq!(ok.text(), "done");

        let failed = InvocationResult::from(Err(BridgeError::UnknownTool("nope".to_string())));
        assert!(!failed.is_success());
        assert_eq!(failed.into_text(), "unknown tool: nope");
    }
}
