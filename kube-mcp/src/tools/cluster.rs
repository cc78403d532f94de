//! Cluster tools

use super::ToolDescriptor;

/// cluster_name tool definition
pub fn cluster_name_tool() -> ToolDescriptor {
    ToolDescriptor::new("cluster_name", "Get the name of the current cluster")
}
