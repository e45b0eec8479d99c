//! JSON-RPC 2.0 message types for the MCP transport.

use serde::{Deserialize, Serialize};

/// MCP protocol version sent during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: i64,
    pub method: String,
    pub params: serde_json::Value,
}

impl JsonRpcRequest {
    pub fn new(id: i64, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// A notification has no id and gets no response.
#[derive(Debug, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// A tool advertised by the orchestration server via `tools/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct McpToolInfo {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// JSON Schema for the tool's arguments.
    #[serde(rename = "inputSchema", default = "default_schema")]
    pub input_schema: serde_json::Value,
}

fn default_schema() -> serde_json::Value {
    serde_json::json!({"type": "object", "properties": {}})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_jsonrpc_two() {
        let req = JsonRpcRequest::new(7, "tools/list", serde_json::json!({}));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "tools/list");
    }

    #[test]
    fn notification_omits_missing_params() {
        let note = JsonRpcNotification::new("notifications/initialized");
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("params").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn parses_error_response() {
        let body = r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32601,"message":"Method not found"}}"#;
        let response: JsonRpcResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.id, Some(3));
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("not found"));
    }

    #[test]
    fn parses_tool_info_with_missing_schema() {
        let body = r#"{"name": "wait_for_mentions", "description": "Wait for mentions"}"#;
        let info: McpToolInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.name, "wait_for_mentions");
        assert_eq!(info.input_schema["type"], "object");
    }

    #[test]
    fn parses_tool_info_with_schema() {
        let body = r#"{
            "name": "send_message",
            "description": "Send a message to a thread",
            "inputSchema": {"type": "object", "required": ["threadId", "content"]}
        }"#;
        let info: McpToolInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.input_schema["required"][0], "threadId");
    }
}
