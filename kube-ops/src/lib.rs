//! Kube Ops - the cluster verbs behind the kube-mcp tools
//!
//! This crate is the only place that talks to a Kubernetes API server.
//! It exposes a narrow verb set through the [`ClusterOps`] trait so the
//! MCP layer can be tested against a double:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  kube-mcp                   │
//! │        catalog → bridge → formatting        │
//! └──────────────────────┬──────────────────────┘
//!                        │ Arc<dyn ClusterOps>
//! ┌──────────────────────▼──────────────────────┐
//! │                  kube-ops                   │
//! │                                             │
//! │  ┌────────────────┐    ┌─────────────────┐  │
//! │  │ KubeClusterOps │    │   kubeconfig    │  │
//! │  │  (kube::Client)│    │ current cluster │  │
//! │  └────────────────┘    └─────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kube_ops::{ClusterOps, KubeClusterOps};
//!
//! let ops = KubeClusterOps::connect(&kubeconfig_path).await?;
//! for pod in ops.list_pods("kube-system").await? {
//!     println!("{} {}", pod.name, pod.phase);
//! }
//! ```

pub mod error;
pub mod kubeconfig;
pub mod ops;

pub use error::{ClusterError, ClusterResult};
pub use ops::{ClusterOps, KubeClusterOps, PodSummary};

/// Re-exported so callers and test doubles name the same resource types.
pub use k8s_openapi::api::apps::v1::Deployment;
pub use k8s_openapi::api::core::v1::Pod;
