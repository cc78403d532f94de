//! Shared test double for the cluster verbs

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::PodStatus;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube_ops::kubeconfig;
use kube_ops::{ClusterError, ClusterOps, ClusterResult, Deployment, Pod, PodSummary};
use tokio::sync::Notify;

/// Kubeconfig whose current context `ctx1` points at `clusterA`
pub const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: ctx1
clusters:
  - name: clusterA
    cluster:
      server: https://127.0.0.1:6443
contexts:
  - name: ctx1
    context:
      cluster: clusterA
      user: admin
users:
  - name: admin
    user: {}
"#;

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPods { namespace: String },
    GetPod { name: String, namespace: String },
    GetDeployment { name: String, namespace: String },
    CreateDeployment { namespace: String, name: String },
    PatchDeployment { name: String, namespace: String, operations: usize },
    GetPodLogs { name: String, namespace: String, tail_lines: i64 },
    CurrentClusterName { config_path: PathBuf },
}

impl Call {
    pub fn verb(&self) -> &'static str {
        match self {
            Call::ListPods { .. } => "list_pods",
            Call::GetPod { .. } => "get_pod",
            Call::GetDeployment { .. } => "get_deployment",
            Call::CreateDeployment { .. } => "create_deployment",
            Call::PatchDeployment { .. } => "patch_deployment",
            Call::GetPodLogs { .. } => "get_pod_logs",
            Call::CurrentClusterName { .. } => "current_cluster_name",
        }
    }
}

/// Records every verb call and answers from canned state
pub struct RecordingCluster {
    calls: Mutex<Vec<Call>>,
    pub pods: Vec<PodSummary>,
    pub kubeconfig: String,
    /// When set, every verb fails with this message
    pub failure: Option<String>,
    /// When set, `get_pod_logs` never completes
    pub hang_logs: bool,
    /// When set, `get_pod` waits for a notification before answering
    pub pod_gate: Option<Arc<Notify>>,
}

impl RecordingCluster {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            pods: Vec::new(),
            kubeconfig: KUBECONFIG.to_string(),
            failure: None,
            hang_logs: false,
            pod_gate: None,
        }
    }

    pub fn with_pods(mut self, pods: Vec<PodSummary>) -> Self {
        self.pods = pods;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn with_hanging_logs(mut self) -> Self {
        self.hang_logs = true;
        self
    }

    pub fn with_pod_gate(mut self, gate: Arc<Notify>) -> Self {
        self.pod_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: Call) -> ClusterResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(ClusterError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

pub fn pod(name: &str, phase: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..ObjectMeta::default()
        },
        status: Some(PodStatus {
            phase: Some(phase.to_string()),
            ..PodStatus::default()
        }),
        ..Pod::default()
    }
}

pub fn deployment(name: &str) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..ObjectMeta::default()
        },
        ..Deployment::default()
    }
}

#[async_trait]
impl ClusterOps for RecordingCluster {
    async fn list_pods(&self, namespace: &str) -> ClusterResult<Vec<PodSummary>> {
        self.record(Call::ListPods {
            namespace: namespace.to_string(),
        })?;
        Ok(self.pods.clone())
    }

    async fn get_pod(&self, name: &str, namespace: &str) -> ClusterResult<Pod> {
        self.record(Call::GetPod {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })?;
        if let Some(gate) = &self.pod_gate {
            gate.notified().await;
        }
        Ok(pod(name, "Running"))
    }

    async fn get_deployment(&self, name: &str, namespace: &str) -> ClusterResult<Deployment> {
        self.record(Call::GetDeployment {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })?;
        Ok(deployment(name))
    }

    async fn create_deployment(&self, namespace: &str, created: &Deployment) -> ClusterResult<Deployment> {
        self.record(Call::CreateDeployment {
            namespace: namespace.to_string(),
            name: created.metadata.name.clone().unwrap_or_default(),
        })?;
        let mut stored = created.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        stored.metadata.uid = Some("uid-1234".to_string());
        Ok(stored)
    }

    async fn patch_deployment(
        &self,
        name: &str,
        namespace: &str,
        patch: &json_patch::Patch,
    ) -> ClusterResult<Deployment> {
        self.record(Call::PatchDeployment {
            name: name.to_string(),
            namespace: namespace.to_string(),
            operations: patch.0.len(),
        })?;
        Ok(deployment(name))
    }

    async fn get_pod_logs(&self, name: &str, namespace: &str, tail_lines: i64) -> ClusterResult<String> {
        self.record(Call::GetPodLogs {
            name: name.to_string(),
            namespace: namespace.to_string(),
            tail_lines,
        })?;
        if self.hang_logs {
            std::future::pending::<()>().await;
        }
        Ok(format!("log line from {}\n", name))
    }

    async fn current_cluster_name(&self, config_path: &Path) -> ClusterResult<String> {
        self.record(Call::CurrentClusterName {
            config_path: config_path.to_path_buf(),
        })?;
        let config = kubeconfig::parse(&self.kubeconfig)?;
        kubeconfig::current_cluster(&config)
    }
}
