//! The reasoning loop implementation.

use coralink_core::error::Error;
use coralink_core::message::{Conversation, Message, Role};
use coralink_core::provider::{Provider, ProviderRequest};
use coralink_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives one conversation: LLM call, tool execution, repeat until the
/// model produces a plain text turn.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry (session operations + local solver)
    tools: Arc<ToolRegistry>,

    /// System prompt prepended to every conversation
    system_prompt: String,

    /// Maximum tool call iterations per conversation
    max_iterations: u32,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            system_prompt: system_prompt.into(),
            max_iterations: 25,
        }
    }

    /// Set the maximum number of tool call iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Process a conversation and return the model's final text.
    ///
    /// 1. Ensures the system prompt is the first message
    /// 2. Calls the LLM with the tool catalog
    /// 3. If tool calls are returned, executes them and loops
    /// 4. Returns the final text response
    pub async fn process(&self, conversation: &mut Conversation) -> Result<String, Error> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing conversation"
        );

        if conversation.messages.is_empty() || conversation.messages[0].role != Role::System {
            conversation
                .messages
                .insert(0, Message::system(&self.system_prompt));
        }

        let tool_definitions = self.tools.definitions();
        let mut iteration = 0;

        loop {
            iteration += 1;

            if iteration > self.max_iterations {
                warn!(
                    conversation_id = %conversation.id,
                    iterations = iteration,
                    "Max tool iterations reached, stopping this cycle"
                );
                break;
            }

            debug!(
                conversation_id = %conversation.id,
                iteration,
                "Reasoning loop iteration"
            );

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                debug!(
                    conversation_id = %conversation.id,
                    tokens = usage.total_tokens,
                    "Turn completed"
                );
            }

            if response.message.tool_calls.is_empty() {
                // No tool calls, this is the final text response.
                let response_text = response.message.content.clone();
                conversation.push(response.message);
                return Ok(response_text);
            }

            let tool_calls = response.message.tool_calls.clone();
            conversation.push(response.message);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                let start = std::time::Instant::now();
                let result = self.tools.execute(&call).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match result {
                    Ok(tool_result) => {
                        debug!(
                            tool = %tc.name,
                            success = tool_result.success,
                            duration_ms,
                            "Tool executed"
                        );
                        conversation.push(Message::tool_result(&tc.id, &tool_result.output));
                    }
                    Err(e) => {
                        // Report the failure to the model so it can still
                        // answer the sender (a cycle never dies on one tool).
                        warn!(tool = %tc.name, error = %e, duration_ms, "Tool execution failed");
                        conversation.push(Message::tool_result(&tc.id, format!("Error: {e}")));
                    }
                }
            }

            // Loop back; the model sees the tool results and decides what's next.
        }

        Ok("Maximum tool iterations reached for this cycle.".into())
    }
}
