//! Pod tools

use super::{ArgKind, ArgSpec, ToolDescriptor};

/// list_pods tool definition
pub fn list_pods_tool() -> ToolDescriptor {
    ToolDescriptor::new("list_pods", "List all pods in the cluster").with_arg(ArgSpec::required(
        "namespace",
        ArgKind::String,
        "The namespace to list pods in",
    ))
}

/// get_pod tool definition
pub fn get_pod_tool() -> ToolDescriptor {
    ToolDescriptor::new("get_pod", "Details about a pod in the default namespace").with_arg(
        ArgSpec::required("name", ArgKind::String, "The name of the pod to get"),
    )
}

/// get_pod_logs tool definition
pub fn get_pod_logs_tool() -> ToolDescriptor {
    ToolDescriptor::new("get_pod_logs", "Logs from a pod in the default namespace").with_arg(
        ArgSpec::required("name", ArgKind::String, "The name of the pod to get logs from"),
    )
}
