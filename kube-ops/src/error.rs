//! Error types for Kube Ops

use thiserror::Error;

/// Result type for cluster operations
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur while talking to the cluster
#[derive(Error, Debug)]
pub enum ClusterError {
    /// The API server rejected or failed the request
    #[error("{0}")]
    Api(#[from] kube::Error),

    /// The kubeconfig could not be read or parsed
    #[error("kubeconfig error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// The kubeconfig has no current-context set
    #[error("no current context set in kubeconfig")]
    NoCurrentContext,

    /// The current-context names a context that is not defined
    #[error("context not found in kubeconfig: {0}")]
    ContextNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
