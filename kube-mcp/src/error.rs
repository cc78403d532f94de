//! Error types for Kube MCP Server
//!
//! Two layers: [`BridgeError`] is a failed tool call and is reported to the
//! agent as ordinary tool output; [`McpError`] is a protocol failure and is
//! reported as a JSON-RPC error.

use std::fmt;

use kube_ops::ClusterError;
use thiserror::Error;

/// Result type for MCP protocol handling
pub type McpResult<T> = Result<T, McpError>;

/// The cluster call a collaborator error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPods,
    GetPod,
    GetDeployment,
    CreateDeployment,
    PatchDeployment,
    GetPodLogs,
    ClusterName,
}

impl Operation {
    /// Prefix put in front of the collaborator's error text
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ListPods => "Error listing pods",
            Operation::GetPod => "Error getting pod",
            Operation::GetDeployment => "Error getting deployment",
            Operation::CreateDeployment => "Error creating deployment",
            Operation::PatchDeployment => "Error patching deployment",
            Operation::GetPodLogs => "Error getting pod logs",
            Operation::ClusterName => "Error getting cluster name",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a tool call failed. The `Display` text is exactly what the agent sees.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No such tool in the catalogue
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A required argument is missing or has the wrong type
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// `patch` is not a list of JSON patch operations
    #[error("Malformed patch: {0}")]
    MalformedPatch(String),

    /// `manifest` does not parse as a deployment
    #[error("Error creating deployment: invalid manifest: {0}")]
    InvalidManifest(String),

    /// `manifest` names a different deployment than `name`
    #[error("Error creating deployment: the manifest name ({manifest}) does not match the deployment name ({requested})")]
    NameMismatch { manifest: String, requested: String },

    /// The cluster call itself failed
    #[error("{operation}: {source}")]
    Cluster {
        operation: Operation,
        #[source]
        source: ClusterError,
    },

    /// The cluster answered but the answer could not be rendered
    #[error("Error marshalling {kind}: {source}")]
    Serialization {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The caller cancelled the request
    #[error("Request cancelled: {0}")]
    Cancelled(String),
}

impl BridgeError {
    pub fn invalid_arguments(tool: &str, reason: impl Into<String>) -> Self {
        BridgeError::InvalidArguments {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    pub fn cluster(operation: Operation) -> impl FnOnce(ClusterError) -> Self {
        move |source| BridgeError::Cluster { operation, source }
    }

    pub fn serialization(kind: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| BridgeError::Serialization { kind, source }
    }
}

/// Errors that can occur in the MCP protocol layer
#[derive(Error, Debug)]
pub enum McpError {
    /// The line was not valid JSON-RPC
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON that is not a JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown JSON-RPC method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Params did not match the method
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Get error code for MCP protocol
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::Parse(_) => -32700,
            McpError::InvalidRequest(_) => -32600,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::Io(_) | McpError::Internal(_) => -32603,
        }
    }
}
