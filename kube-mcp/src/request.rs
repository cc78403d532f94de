//! Argument extraction
//!
//! An incoming call is an untyped name plus argument map. It is decoded once
//! into a [`ToolRequest`] so each bridge adapter works with typed values.
//!
//! Required string arguments that are missing or not strings are rejected
//! with [`BridgeError::InvalidArguments`]; empty strings pass through. A
//! `patch` that is not a list of JSON patch operations is rejected with
//! [`BridgeError::MalformedPatch`]. Extra arguments are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::BridgeError;
use crate::tools;

/// Tool call request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A call whose arguments have been validated against its tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ListPods { namespace: String },
    GetPod { name: String },
    GetDeployment { name: String },
    CreateDeployment { name: String, manifest: String },
    PatchDeployment { name: String, patch: json_patch::Patch },
    GetPodLogs { name: String },
    ClusterName,
}

impl ToolRequest {
    /// Validate `call` against the catalogue and extract its arguments
    pub fn decode(call: &ToolCall) -> Result<Self, BridgeError> {
        let tool = tools::get(&call.name).ok_or_else(|| BridgeError::UnknownTool(call.name.clone()))?;
        let args = Args {
            tool: tool.name,
            values: &call.arguments,
        };

        let request = match tool.name {
            "list_pods" => ToolRequest::ListPods {
                namespace: args.string("namespace")?,
            },
            "get_pod" => ToolRequest::GetPod {
                name: args.string("name")?,
            },
            "get_deployment" => ToolRequest::GetDeployment {
                name: args.string("name")?,
            },
            "create_deployment" => ToolRequest::CreateDeployment {
                name: args.string("name")?,
                manifest: args.string("manifest")?,
            },
            "patch_deployment" => ToolRequest::PatchDeployment {
                name: args.string("name")?,
                patch: args.patch("patch")?,
            },
            "get_pod_logs" => ToolRequest::GetPodLogs {
                name: args.string("name")?,
            },
            "cluster_name" => ToolRequest::ClusterName,
            other => return Err(BridgeError::UnknownTool(other.to_string())),
        };

        Ok(request)
    }

    /// Catalogue name of the tool this request targets
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::ListPods { .. } => "list_pods",
            ToolRequest::GetPod { .. } => "get_pod",
            ToolRequest::GetDeployment { .. } => "get_deployment",
            ToolRequest::CreateDeployment { .. } => "create_deployment",
            ToolRequest::PatchDeployment { .. } => "patch_deployment",
            ToolRequest::GetPodLogs { .. } => "get_pod_logs",
            ToolRequest::ClusterName => "cluster_name",
        }
    }
}

struct Args<'a> {
    tool: &'static str,
    values: &'a Map<String, Value>,
}

impl Args<'_> {
    fn string(&self, key: &str) -> Result<String, BridgeError> {
        match self.values.get(key) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => Err(BridgeError::invalid_arguments(
                self.tool,
                format!("argument '{}' must be a string, got {}", key, type_name(other)),
            )),
            None => Err(BridgeError::invalid_arguments(
                self.tool,
                format!("missing required argument '{}'", key),
            )),
        }
    }

    fn patch(&self, key: &str) -> Result<json_patch::Patch, BridgeError> {
        match self.values.get(key) {
            Some(Value::Array(operations)) => {
                serde_json::from_value(Value::Array(operations.clone()))
                    .map_err(|e| BridgeError::MalformedPatch(e.to_string()))
            }
            Some(other) => Err(BridgeError::MalformedPatch(format!(
                "'{}' must be a list of patch operations, got {}",
                key,
                type_name(other)
            ))),
            None => Err(BridgeError::MalformedPatch(format!(
                "missing required argument '{}'",
                key
            ))),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(name: &str, arguments: Value) -> Result<ToolRequest, BridgeError> {
        ToolRequest::decode(&ToolCall::new(name, arguments))
    }

    #[test]
    fn test_decode_list_pods() {
        let request = decode("list_pods", json!({ "namespace": "kube-system" })).unwrap();
        assert_eq!(
            request,
            ToolRequest::ListPods {
                namespace: "kube-system".to_string()
            }
        );
        assert_eq!(request.tool_name(), "list_pods");
    }

    #[test]
    fn test_empty_namespace_passes_through() {
        let request = decode("list_pods", json!({ "namespace": "" })).unwrap();
        assert_eq!(request, ToolRequest::ListPods { namespace: String::new() });
    }

    #[test]
    fn test_missing_string_argument() {
        let err = decode("get_pod", json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments for get_pod: missing required argument 'name'"
        );
    }

    #[test]
    fn test_wrong_typed_string_argument() {
        let err = decode("get_pod_logs", json!({ "name": 42 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments for get_pod_logs: argument 'name' must be a string, got a number"
        );
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let request = decode("cluster_name", json!({ "verbose": true })).unwrap();
        assert_eq!(request, ToolRequest::ClusterName);
    }

    #[test]
    fn test_decode_patch() {
        let request = decode(
            "patch_deployment",
            json!({
                "name": "web",
                "patch": [
                    { "op": "replace", "path": "/spec/replicas", "value": 3 }
                ]
            }),
        )
        .unwrap();

        match request {
            ToolRequest::PatchDeployment { name, patch } => {
                assert_eq!(name, "web");
                assert_eq!(patch.0.len(), 1);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_patch_must_be_a_list() {
        let err = decode("patch_deployment", json!({ "name": "x", "patch": "not-a-list" })).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedPatch(_)));
        assert!(err.to_string().starts_with("Malformed patch: "));
    }

    #[test]
    fn test_patch_records_must_be_operations() {
        let err = decode(
            "patch_deployment",
            json!({ "name": "x", "patch": [{ "path": "/spec" }] }),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::MalformedPatch(_)));
    }

    #[test]
    fn test_missing_patch_is_malformed() {
        let err = decode("patch_deployment", json!({ "name": "x" })).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedPatch(_)));
    }

    #[test]
    fn test_unknown_tool() {
        let err = decode("delete_pod", json!({ "name": "x" })).unwrap_err();
        assert_eq!(err.to_string(), "unknown tool: delete_pod");
    }

    #[test]
    fn test_non_object_arguments_are_empty() {
        let call = ToolCall::new("get_pod", json!(["p1"]));
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_tool_call_deserialization_defaults() {
        let call: ToolCall = serde_json::from_value(json!({ "name": "cluster_name" })).unwrap();
        assert_eq!(call.name, "cluster_name");
        assert!(call.arguments.is_empty());
    }
}
