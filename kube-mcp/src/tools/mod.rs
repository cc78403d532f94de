//! Tool catalogue
//!
//! These are the tools exposed to agents through the MCP protocol. The
//! catalogue is built once and is the only source of tool names the bridge
//! will dispatch.

pub mod cluster;
pub mod deployments;
pub mod pods;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Kind of value an argument carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// A JSON string
    String,
    /// A JSON array of objects
    List,
}

/// One argument of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
    pub description: &'static str,
}

impl ArgSpec {
    pub const fn required(name: &'static str, kind: ArgKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    fn schema(&self) -> Value {
        match self.kind {
            ArgKind::String => json!({
                "type": "string",
                "description": self.description
            }),
            ArgKind::List => json!({
                "type": "array",
                "items": { "type": "object" },
                "description": self.description
            }),
        }
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// Tool name
    pub name: &'static str,

    /// Description shown to the agent
    pub description: &'static str,

    /// Arguments in declaration order
    pub args: Vec<ArgSpec>,
}

impl ToolDescriptor {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    #[cfg(test)]
    fn arg(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|arg| arg.name == name)
    }

    /// JSON Schema for the tool's input, as advertised in `tools/list`
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .args
            .iter()
            .map(|arg| (arg.name.to_string(), arg.schema()))
            .collect();
        let required: Vec<&str> = self
            .args
            .iter()
            .filter(|arg| arg.required)
            .map(|arg| arg.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Entry for the `tools/list` response
    pub fn to_mcp(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema()
        })
    }
}

/// Every tool, keyed by name
pub fn describe_all() -> &'static BTreeMap<&'static str, ToolDescriptor> {
    static CATALOG: OnceLock<BTreeMap<&'static str, ToolDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        [
            pods::list_pods_tool(),
            pods::get_pod_tool(),
            pods::get_pod_logs_tool(),
            deployments::get_deployment_tool(),
            deployments::create_deployment_tool(),
            deployments::patch_deployment_tool(),
            cluster::cluster_name_tool(),
        ]
        .into_iter()
        .map(|tool| (tool.name, tool))
        .collect()
    })
}

/// Look up a single tool
pub fn get(name: &str) -> Option<&'static ToolDescriptor> {
    describe_all().get(name)
}
