//! System prompt assembly.
//!
//! The prompt carries the agent's standing instructions plus a rendered
//! catalog of every tool it can call, so the model knows the session
//! operations (`wait_for_mentions`, `send_message`) and the local solver
//! by name and schema.

use coralink_core::provider::ToolDefinition;

/// The instruction that seeds each runner cycle.
pub const CYCLE_INSTRUCTION: &str =
    "Check for new mentions and respond to any pending requests.";

/// Build the system prompt for an agent session.
pub fn system_prompt(agent_id: &str, tools: &[ToolDefinition]) -> String {
    let catalog = tools_description(tools);

    format!(
        "You are {agent_id}, a specialized high school economics tutor agent that helps \
students understand and solve economics problems. You interact with tools from the \
orchestration server and have your own economics solving capabilities.

Follow these steps in order:

1. Call wait_for_mentions (timeoutMs: 30000) to receive mentions from other agents.
2. When you receive a mention, keep the thread ID and the sender ID.
3. Analyze the content to identify if it contains an economics problem or question.
4. If it's an economics problem, use your economics_solver tool to solve it step by \
step, explain the concepts involved, and give real-world examples.
5. If it's a general economics question, explain the concepts clearly at a high school \
level.
6. Structure your response with: clear problem identification, a step-by-step solution, \
the final answer with units, and key takeaways.
7. Use send_message to send your complete solution back to the sender.
8. If any error occurs, use send_message to send a brief error explanation instead.
9. Always respond back to the sender agent, even if you cannot solve the problem.
10. Repeat from step 1.

These are your available tools:
{catalog}"
    )
}

/// Render the tool catalog the way the model sees it.
fn tools_description(tools: &[ToolDefinition]) -> String {
    tools
        .iter()
        .map(|t| {
            format!(
                "Tool: {}, Description: {}, Schema: {}",
                t.name, t.description, t.parameters
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
