//! The orchestration session.
//!
//! Session lifecycle:
//! 1. GET `{CORAL_SSE_URL}?agentId=..&agentDescription=..` and hold the SSE
//!    stream open for the life of the process.
//! 2. The first `endpoint` event names the URL where JSON-RPC requests are
//!    POSTed back. Responses arrive as `message` events on the stream and
//!    are matched to requests by id.
//! 3. `initialize` + `notifications/initialized` handshake, then
//!    `tools/list` / `tools/call` as the reasoning loop demands.

use crate::rpc::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, McpToolInfo, PROTOCOL_VERSION,
};
use crate::sse::SseParser;
use coralink_config::CoralSettings;
use coralink_core::error::SessionError;
use futures::StreamExt;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

type Pending = Arc<Mutex<HashMap<i64, oneshot::Sender<JsonRpcResponse>>>>;

/// Output of a remote tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

/// An open session with the orchestration endpoint.
pub struct CoralSession {
    http: reqwest::Client,
    endpoint_url: Url,
    pending: Pending,
    request_id: AtomicI64,
    timeout: Duration,
    reader: tokio::task::JoinHandle<()>,
}

impl CoralSession {
    /// Open a session and complete the handshake.
    pub async fn connect(settings: &CoralSettings) -> Result<Self, SessionError> {
        let url = Self::session_url(settings)?;
        info!(url = %redact_query(&url), agent_id = %settings.agent_id, "Connecting to orchestration endpoint");

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SessionError::Connect(format!("HTTP client: {e}")))?;

        let response = http
            .get(url.clone())
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SessionError::Unauthorized(format!(
                "server returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(SessionError::Connect(format!("server returned {status}")));
        }

        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();
        let timeout = Duration::from_secs(settings.timeout_secs);

        // The server's first event names the POST-back endpoint.
        let endpoint = tokio::time::timeout(timeout, async {
            while let Some(chunk) = stream.next().await {
                let bytes = chunk.map_err(|e| SessionError::Connect(e.to_string()))?;
                for event in parser.feed(&bytes) {
                    if event.event == "endpoint" {
                        return Ok(event.data);
                    }
                }
            }
            Err(SessionError::StreamClosed)
        })
        .await
        .map_err(|_| SessionError::Timeout("endpoint event".into()))??;

        let endpoint_url = url
            .join(&endpoint)
            .map_err(|e| SessionError::InvalidPayload(format!("endpoint URL '{endpoint}': {e}")))?;
        debug!(endpoint = %endpoint_url, "Received session endpoint");

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_loop(stream, parser, pending.clone()));

        let session = Self {
            http,
            endpoint_url,
            pending,
            request_id: AtomicI64::new(1),
            timeout,
            reader,
        };

        session.initialize().await?;
        info!("Orchestration session established");
        Ok(session)
    }

    /// The configured session read timeout.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Build the session URL with the agent's registration parameters.
    fn session_url(settings: &CoralSettings) -> Result<Url, SessionError> {
        let mut url = Url::parse(&settings.sse_url)
            .map_err(|e| SessionError::Connect(format!("invalid CORAL_SSE_URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("agentId", &settings.agent_id)
            .append_pair("agentDescription", &settings.agent_description);
        Ok(url)
    }

    async fn initialize(&self) -> Result<(), SessionError> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "coralink",
                "version": env!("CARGO_PKG_VERSION"),
            }
        });

        let result = self
            .request("initialize", params)
            .await
            .map_err(|e| match e {
                SessionError::Rpc { code, message } => SessionError::Handshake(format!(
                    "initialize rejected ({code}): {message}"
                )),
                other => other,
            })?;

        let server = result
            .get("serverInfo")
            .and_then(|s| s.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");
        debug!(server, "Handshake accepted");

        self.notify("notifications/initialized").await
    }

    /// List the tools the server advertises.
    pub async fn list_tools(&self) -> Result<Vec<McpToolInfo>, SessionError> {
        let result = self.request("tools/list", serde_json::json!({})).await?;
        let tools = result
            .get("tools")
            .cloned()
            .ok_or_else(|| SessionError::InvalidPayload("tools/list missing 'tools'".into()))?;
        serde_json::from_value(tools)
            .map_err(|e| SessionError::InvalidPayload(format!("tools/list: {e}")))
    }

    /// Invoke a remote tool.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, SessionError> {
        let params = serde_json::json!({
            "name": name,
            "arguments": arguments,
        });
        let result = self.request("tools/call", params).await?;

        // MCP tool results carry a content array; concatenate the text items.
        let text = result
            .get("content")
            .and_then(|c| c.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_else(|| result.to_string());

        let is_error = result
            .get("isError")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Ok(ToolOutput { text, is_error })
    }

    /// POST a request and wait for the matching response on the SSE stream.
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, SessionError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let request = JsonRpcRequest::new(id, method, params);
        let outcome = self
            .http
            .post(self.endpoint_url.clone())
            .json(&request)
            .send()
            .await;

        let response = match outcome {
            Ok(r) => r,
            Err(e) => {
                self.pending.lock().await.remove(&id);
                return Err(SessionError::Connect(e.to_string()));
            }
        };

        if !response.status().is_success() {
            self.pending.lock().await.remove(&id);
            let status = response.status().as_u16();
            if status == 401 || status == 403 {
                return Err(SessionError::Unauthorized(format!("POST returned {status}")));
            }
            return Err(SessionError::Connect(format!("POST returned {status}")));
        }

        // The server acknowledges the POST and replies over the stream.
        let reply = match tokio::time::timeout(self.timeout, rx).await {
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(SessionError::Timeout(method.to_string()));
            }
            Ok(Err(_)) => return Err(SessionError::StreamClosed),
            Ok(Ok(reply)) => reply,
        };

        if let Some(error) = reply.error {
            return Err(SessionError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        reply
            .result
            .ok_or_else(|| SessionError::InvalidPayload(format!("{method}: empty result")))
    }

    /// POST a notification; nothing comes back.
    async fn notify(&self, method: &str) -> Result<(), SessionError> {
        let note = JsonRpcNotification::new(method);
        self.http
            .post(self.endpoint_url.clone())
            .json(&note)
            .send()
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?
            .error_for_status()
            .map_err(|e| SessionError::Connect(e.to_string()))?;
        Ok(())
    }
}

impl Drop for CoralSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Consume the SSE stream, routing JSON-RPC responses to their waiters.
async fn read_loop(
    mut stream: impl futures::Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin,
    mut parser: SseParser,
    pending: Pending,
) {
    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "Session stream error");
                break;
            }
        };

        for event in parser.feed(&bytes) {
            if event.event != "message" {
                debug!(event = %event.event, "Ignoring non-message event");
                continue;
            }
            match serde_json::from_str::<JsonRpcResponse>(&event.data) {
                Ok(response) => {
                    let Some(id) = response.id else {
                        debug!("Server notification ignored");
                        continue;
                    };
                    if let Some(waiter) = pending.lock().await.remove(&id) {
                        let _ = waiter.send(response);
                    } else {
                        warn!(id, "Response for unknown request id");
                    }
                }
                Err(e) => warn!(error = %e, "Unparseable message event"),
            }
        }
    }

    // Dropping the map wakes every waiter with a closed-channel error,
    // which surfaces as SessionError::StreamClosed.
    pending.lock().await.clear();
    warn!("Session stream ended");
}

/// The session URL carries the agent description; keep logs short.
fn redact_query(url: &Url) -> String {
    let mut short = url.clone();
    short.set_query(None);
    short.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CoralSettings {
        CoralSettings {
            sse_url: "http://localhost:5555/devmode/exampleApp/privkey/session1/sse".into(),
            agent_id: "econ-tutor".into(),
            agent_description: "economics tutor".into(),
            orchestrated: false,
            timeout_secs: 300,
        }
    }

    #[test]
    fn session_url_encodes_registration_params() {
        let url = CoralSession::session_url(&settings()).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("agentId=econ-tutor"));
        assert!(query.contains("agentDescription=economics+tutor"));
    }

    #[test]
    fn session_url_rejects_garbage() {
        let mut bad = settings();
        bad.sse_url = "not a url".into();
        assert!(matches!(
            CoralSession::session_url(&bad),
            Err(SessionError::Connect(_))
        ));
    }

    #[test]
    fn tool_output_from_content_array() {
        // Shape of a tools/call result as routed by read_loop.
        let result = serde_json::json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ],
            "isError": false
        });
        let text = result["content"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|item| item["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(text, "first\nsecond");
    }

    #[tokio::test]
    async fn read_loop_routes_by_id() {
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(4, tx);

        let body = "data: {\"jsonrpc\":\"2.0\",\"id\":4,\"result\":{\"ok\":true}}\n\n";
        let stream = futures::stream::iter(vec![reqwest::Result::Ok(bytes::Bytes::from(
            body.to_string(),
        ))]);
        read_loop(Box::pin(stream), SseParser::new(), pending.clone()).await;

        let response = rx.await.unwrap();
        assert_eq!(response.id, Some(4));
        assert_eq!(response.result.unwrap()["ok"], true);
    }

    #[tokio::test]
    async fn read_loop_drops_waiters_on_stream_end() {
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(9, tx);

        let stream = futures::stream::iter(Vec::<reqwest::Result<bytes::Bytes>>::new());
        read_loop(Box::pin(stream), SseParser::new(), pending.clone()).await;

        // Waiter observes the closed channel.
        assert!(rx.await.is_err());
    }
}
