//! Kubeconfig access
//!
//! The cluster name is read straight from the kubeconfig file every time it
//! is asked for; it is not taken from the already-connected client.

use std::path::Path;

use kube::config::Kubeconfig;

use crate::error::{ClusterError, ClusterResult};

/// Read and parse the kubeconfig at `path`
pub fn load(path: &Path) -> ClusterResult<Kubeconfig> {
    Ok(Kubeconfig::read_from(path)?)
}

/// Parse a kubeconfig document held in memory
pub fn parse(text: &str) -> ClusterResult<Kubeconfig> {
    Ok(Kubeconfig::from_yaml(text)?)
}

/// Name of the cluster the current context points at
pub fn current_cluster(config: &Kubeconfig) -> ClusterResult<String> {
    let current = config
        .current_context
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(ClusterError::NoCurrentContext)?;

    config
        .contexts
        .iter()
        .find(|named| named.name == current)
        .and_then(|named| named.context.as_ref())
        .map(|context| context.cluster.clone())
        .ok_or_else(|| ClusterError::ContextNotFound(current.to_string()))
}
