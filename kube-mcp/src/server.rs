//! MCP Server protocol implementation
//!
//! This module handles the MCP JSON-RPC protocol over stdio: one JSON
//! message per line in each direction. Tool calls run as independent tasks
//! so a slow cluster call does not hold up `ping` or other calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::bridge::ToolBridge;
use crate::error::{McpError, McpResult};
use crate::request::ToolCall;
use crate::tools;
use crate::{SERVER_INSTRUCTIONS, SERVER_NAME, SERVER_VERSION};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP JSON-RPC request (or notification, when `id` is absent)
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpErrorBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct McpErrorBody {
    pub code: i32,
    pub message: String,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, err: &McpError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpErrorBody {
                code: err.error_code(),
                message: err.to_string(),
            }),
        }
    }
}

/// A running tool call that can still be cancelled
#[derive(Debug, Clone)]
struct InFlight {
    seq: u64,
    cancel: CancellationToken,
}

/// MCP server exposing the Kubernetes tools
#[derive(Clone)]
pub struct McpServer {
    bridge: ToolBridge,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
    next_seq: Arc<AtomicU64>,
}

impl McpServer {
    pub fn new(bridge: ToolBridge) -> Self {
        Self {
            bridge,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the MCP server over stdio
    pub async fn run_stdio(&self) -> McpResult<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve line-delimited JSON-RPC until `reader` reaches EOF
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> McpResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<McpResponse>();
        let writer_task = tokio::spawn(write_responses(writer, rx));
        let mut calls = JoinSet::new();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!("<- {}", line);

            let request = match decode_request(&line) {
                Ok(request) => request,
                Err(response) => {
                    let _ = tx.send(*response);
                    continue;
                }
            };

            // Register before spawning so a cancel on the next line finds the call
            let call = self.track(&request);
            if request.method == "tools/call" {
                let server = self.clone();
                let tx = tx.clone();
                calls.spawn(async move {
                    if let Some(response) = server.respond(request, call).await {
                        let _ = tx.send(response);
                    }
                });
            } else if let Some(response) = self.respond(request, call).await {
                let _ = tx.send(response);
            }
        }

        tracing::info!("Input closed, waiting for {} in-flight call(s)", self.in_flight_count());
        while let Some(joined) = calls.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Tool call task failed: {}", e);
            }
        }

        drop(tx);
        writer_task
            .await
            .map_err(|e| McpError::Internal(format!("writer task failed: {}", e)))??;
        Ok(())
    }

    /// Handle an MCP message; notifications produce no response
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let call = self.track(&request);
        self.respond(request, call).await
    }

    /// Token for a tool call, registered under its request id when it has one.
    /// A reused id replaces the earlier registration; cancels go to the newest call.
    fn track(&self, request: &McpRequest) -> InFlight {
        let call = InFlight {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            cancel: CancellationToken::new(),
        };
        if request.method == "tools/call" {
            if let Some(id) = &request.id {
                if self.lock_in_flight().insert(request_key(id), call.clone()).is_some() {
                    tracing::warn!(request = %id, "Request id reused while still in flight");
                }
            }
        }
        call
    }

    /// Drop the registration for `id` unless a later call has taken it over
    fn untrack(&self, id: &Value, call: &InFlight) {
        let key = request_key(id);
        let mut in_flight = self.lock_in_flight();
        if in_flight.get(&key).is_some_and(|current| current.seq == call.seq) {
            in_flight.remove(&key);
        }
    }

    async fn respond(&self, request: McpRequest, call: InFlight) -> Option<McpResponse> {
        let McpRequest { id, method, params, .. } = request;

        let result = match method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => {
                let result = self.handle_tools_call(params, &call.cancel).await;
                if let Some(id) = &id {
                    self.untrack(id, &call);
                }
                result
            }
            "notifications/cancelled" => {
                self.handle_cancelled(&params);
                return None;
            }
            other if other.starts_with("notifications/") => {
                tracing::debug!("Notification: {}", other);
                return None;
            }
            _ => Err(McpError::MethodNotFound(method.clone())),
        };

        // Notifications never get a reply, even when they fail
        let id = id?;
        Some(match result {
            Ok(value) => McpResponse::success(Some(id), value),
            Err(err) => McpResponse::failure(Some(id), &err),
        })
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "capabilities": {
                "tools": {}
            },
            "instructions": SERVER_INSTRUCTIONS
        })
    }

    fn handle_tools_list(&self) -> Value {
        let tools: Vec<Value> = tools::describe_all()
            .values()
            .map(|tool| tool.to_mcp())
            .collect();

        json!({ "tools": tools })
    }

    async fn handle_tools_call(&self, params: Value, cancel: &CancellationToken) -> McpResult<Value> {
        if params.get("name").and_then(Value::as_str).is_none() {
            return Err(McpError::InvalidParams("tools/call requires a string 'name'".to_string()));
        }
        let call: ToolCall =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        tracing::info!(tool = %call.name, "Tool call");
        let result = self.bridge.invoke(&call, cancel).await;

        Ok(json!({
            "content": [{
                "type": "text",
                "text": result.into_text()
            }],
            "isError": false
        }))
    }

    fn handle_cancelled(&self, params: &Value) {
        let Some(request_id) = params.get("requestId") else {
            return;
        };
        let key = request_key(request_id);
        if let Some(call) = self.lock_in_flight().get(&key) {
            tracing::info!(
                request = %key,
                reason = params.get("reason").and_then(serde_json::Value::as_str).unwrap_or(""),
                "Cancelling tool call"
            );
            call.cancel.cancel();
        }
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashMap<String, InFlight>> {
        // A panic while holding the lock leaves the map itself intact
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of tool calls currently running
    pub fn in_flight_count(&self) -> usize {
        self.lock_in_flight().len()
    }
}

fn request_key(id: &Value) -> String {
    id.to_string()
}

/// Parse one input line. Bad JSON is a parse error with a null id; JSON that
/// is not a request keeps whatever id it carries.
fn decode_request(line: &str) -> Result<McpRequest, Box<McpResponse>> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        tracing::warn!("Unparsable message: {}", e);
        Box::new(McpResponse::failure(None, &McpError::Parse(e)))
    })?;

    let id = value.get("id").filter(|id| !id.is_null()).cloned();
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Invalid request: {}", e);
        Box::new(McpResponse::failure(id, &McpError::InvalidRequest(e.to_string())))
    })
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<McpResponse>) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let line = serde_json::to_string(&response)?;
        tracing::debug!("-> {}", line);
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
