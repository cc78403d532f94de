//! Cluster verbs and their kube-rs implementation

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams, LogParams, Patch, PatchParams, PostParams};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use serde::{Deserialize, Serialize};

use crate::error::ClusterResult;
use crate::kubeconfig;

/// The verb set the MCP bridge relies on.
///
/// Implementations must be safe to share between concurrent calls; the
/// bridge holds one instance behind an `Arc` and adds no locking of its own.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// List pods in `namespace`; an empty namespace means all namespaces
    async fn list_pods(&self, namespace: &str) -> ClusterResult<Vec<PodSummary>>;

    /// Fetch a single pod
    async fn get_pod(&self, name: &str, namespace: &str) -> ClusterResult<Pod>;

    /// Fetch a single deployment
    async fn get_deployment(&self, name: &str, namespace: &str) -> ClusterResult<Deployment>;

    /// Create a deployment and return what the API server stored
    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> ClusterResult<Deployment>;

    /// Apply a JSON patch to a deployment
    async fn patch_deployment(
        &self,
        name: &str,
        namespace: &str,
        patch: &json_patch::Patch,
    ) -> ClusterResult<Deployment>;

    /// Most recent `tail_lines` lines of a pod's logs
    async fn get_pod_logs(&self, name: &str, namespace: &str, tail_lines: i64) -> ClusterResult<String>;

    /// Cluster behind the current context of the kubeconfig at `config_path`
    async fn current_cluster_name(&self, config_path: &Path) -> ClusterResult<String>;
}

/// One row of a pod listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSummary {
    pub name: String,

    /// Pod phase (Pending, Running, ...); `Unknown` when the API omits it
    pub phase: String,

    pub created: Option<DateTime<Utc>>,
}

impl From<&Pod> for PodSummary {
    fn from(pod: &Pod) -> Self {
        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            phase: pod
                .status
                .as_ref()
                .and_then(|status| status.phase.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            created: pod.metadata.creation_timestamp.as_ref().map(|time| time.0),
        }
    }
}

/// [`ClusterOps`] backed by a live API server
#[derive(Clone)]
pub struct KubeClusterOps {
    client: Client,
}

impl KubeClusterOps {
    /// Wrap an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the kubeconfig at `path`, using its current context
    pub async fn connect(path: &Path) -> ClusterResult<Self> {
        let kubeconfig = kubeconfig::load(path)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
        tracing::info!("Connecting to cluster at {}", config.cluster_url);
        let client = Client::try_from(config)?;
        Ok(Self::new(client))
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        if namespace.is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace)
        }
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ClusterOps for KubeClusterOps {
    async fn list_pods(&self, namespace: &str) -> ClusterResult<Vec<PodSummary>> {
        tracing::info!(namespace, "Listing Kubernetes pods");
        let pods = self.pods(namespace).list(&ListParams::default()).await?;
        Ok(pods.items.iter().map(PodSummary::from).collect())
    }

    async fn get_pod(&self, name: &str, namespace: &str) -> ClusterResult<Pod> {
        tracing::info!(name, namespace, "Getting Kubernetes pod");
        Ok(self.pods(namespace).get(name).await?)
    }

    async fn get_deployment(&self, name: &str, namespace: &str) -> ClusterResult<Deployment> {
        tracing::info!(name, namespace, "Getting Kubernetes deployment");
        Ok(self.deployments(namespace).get(name).await?)
    }

    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> ClusterResult<Deployment> {
        tracing::info!(
            name = deployment.metadata.name.as_deref().unwrap_or_default(),
            namespace,
            "Creating Kubernetes deployment"
        );
        Ok(self
            .deployments(namespace)
            .create(&PostParams::default(), deployment)
            .await?)
    }

    async fn patch_deployment(
        &self,
        name: &str,
        namespace: &str,
        patch: &json_patch::Patch,
    ) -> ClusterResult<Deployment> {
        tracing::info!(name, namespace, operations = patch.0.len(), "Patching Kubernetes deployment");
        let patch = Patch::Json::<()>(patch.clone());
        Ok(self
            .deployments(namespace)
            .patch(name, &PatchParams::default(), &patch)
            .await?)
    }

    async fn get_pod_logs(&self, name: &str, namespace: &str, tail_lines: i64) -> ClusterResult<String> {
        tracing::info!(name, namespace, tail_lines, "Getting Kubernetes pod logs");
        let params = LogParams {
            tail_lines: Some(tail_lines),
            ..LogParams::default()
        };
        Ok(self.pods(namespace).logs(name, &params).await?)
    }

    async fn current_cluster_name(&self, config_path: &Path) -> ClusterResult<String> {
        tracing::debug!(path = %config_path.display(), "Reading current cluster from kubeconfig");
        let config = kubeconfig::load(config_path)?;
        kubeconfig::current_cluster(&config)
    }
}
