//! Kube MCP Server Library
//!
//! This crate implements a Model Context Protocol (MCP) server that lets
//! agents inspect and change a Kubernetes cluster through a small, fixed set
//! of tools.
//!
//! ## Architecture
//!
//! ```text
//! Agent (Claude, GPT, etc.)
//!        │  JSON-RPC over stdio
//!        ▼
//! ┌─────────────────────┐
//! │     MCP Server      │ ◄── This crate
//! │                     │
//! │  ┌───────────────┐  │
//! │  │    Catalog    │  │ - list_pods
//! │  │               │  │ - get_pod / get_pod_logs
//! │  │               │  │ - get_deployment
//! │  │               │  │ - create_deployment
//! │  │               │  │ - patch_deployment
//! │  │               │  │ - cluster_name
//! │  └───────┬───────┘  │
//! │  ┌───────▼───────┐  │
//! │  │    Bridge     │  │ decode → one cluster verb → text
//! │  └───────┬───────┘  │
//! └──────────┼──────────┘
//!            ▼
//! ┌─────────────────────┐
//! │      kube-ops       │
//! │  ClusterOps (kube)  │
//! └─────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kube_mcp::{McpServer, ToolBridge};
//! use kube_ops::KubeClusterOps;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ops = KubeClusterOps::connect(&path).await.unwrap();
//!     let bridge = ToolBridge::new(Arc::new(ops), path);
//!     McpServer::new(bridge).run_stdio().await.unwrap();
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod request;
pub mod server;
pub mod tools;

pub use bridge::{InvocationResult, ToolBridge, DEFAULT_NAMESPACE, LOG_TAIL_LINES};
pub use config::ServerConfig;
pub use error::{BridgeError, McpError, McpResult, Operation};
pub use request::{ToolCall, ToolRequest};
pub use server::McpServer;
pub use tools::{describe_all, ArgKind, ArgSpec, ToolDescriptor};

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "kubernetes";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVER_INSTRUCTIONS: &str = "Use these tools to answer questions about the Kubernetes cluster. \
Every tool except list_pods works in the default namespace.";
