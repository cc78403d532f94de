//! Deployment tools

use super::{ArgKind, ArgSpec, ToolDescriptor};

/// get_deployment tool definition
pub fn get_deployment_tool() -> ToolDescriptor {
    ToolDescriptor::new("get_deployment", "Details about a deployment in the default namespace")
        .with_arg(ArgSpec::required(
            "name",
            ArgKind::String,
            "The name of the deployment to get",
        ))
}

/// create_deployment tool definition
pub fn create_deployment_tool() -> ToolDescriptor {
    ToolDescriptor::new("create_deployment", "Create a deployment in the default namespace")
        .with_arg(ArgSpec::required("name", ArgKind::String, "The name of the deployment"))
        .with_arg(ArgSpec::required(
            "manifest",
            ArgKind::String,
            "The manifest in json (or yaml) format to create the deployment with",
        ))
}

/// patch_deployment tool definition
pub fn patch_deployment_tool() -> ToolDescriptor {
    ToolDescriptor::new("patch_deployment", "Patch a deployment in the default namespace")
        .with_arg(ArgSpec::required(
            "name",
            ArgKind::String,
            "The name of the deployment to patch",
        ))
        .with_arg(ArgSpec::required(
            "patch",
            ArgKind::List,
            "The JSON patch to apply to the deployment. The patch is a list of maps, each map contains an 'op' and 'path' key.",
        ))
}
