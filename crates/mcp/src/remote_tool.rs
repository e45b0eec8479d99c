//! Adapter exposing an orchestration server operation as a local `Tool`.

use crate::rpc::McpToolInfo;
use crate::session::CoralSession;
use async_trait::async_trait;
use coralink_core::error::{SessionError, ToolError};
use coralink_core::tool::{Tool, ToolResult};
use std::sync::Arc;

/// A tool that executes on the orchestration server.
pub struct RemoteTool {
    session: Arc<CoralSession>,
    info: McpToolInfo,
}

impl RemoteTool {
    pub fn new(session: Arc<CoralSession>, info: McpToolInfo) -> Self {
        Self { session, info }
    }

    /// Wrap every tool the server advertises.
    pub async fn discover(session: &Arc<CoralSession>) -> Result<Vec<RemoteTool>, SessionError> {
        let infos = session.list_tools().await?;
        Ok(infos
            .into_iter()
            .map(|info| RemoteTool::new(Arc::clone(session), info))
            .collect())
    }
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn description(&self) -> &str {
        &self.info.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        self.info.input_schema.clone()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let output = self
            .session
            .call_tool(&self.info.name, arguments)
            .await
            .map_err(|e| match e {
                SessionError::Timeout(_) => ToolError::Timeout {
                    tool_name: self.info.name.clone(),
                    timeout_secs: self.session.timeout_secs(),
                },
                other => ToolError::ExecutionFailed {
                    tool_name: self.info.name.clone(),
                    reason: other.to_string(),
                },
            })?;

        Ok(ToolResult {
            call_id: String::new(),
            success: !output.is_error,
            output: output.text,
        })
    }
}
