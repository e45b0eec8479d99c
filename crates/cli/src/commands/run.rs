//! `coralink run` — connect to the orchestration endpoint and serve.

use coralink_agent::{AgentLoop, Runner, prompt};
use coralink_config::Settings;
use coralink_core::error::SessionError;
use coralink_core::tool::ToolRegistry;
use coralink_mcp::{CoralSession, RemoteTool};
use coralink_solver::EconSolverTool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const CONNECT_BACKOFF: Duration = Duration::from_secs(5);

pub async fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    info!(
        agent_id = %settings.coral.agent_id,
        orchestrated = settings.coral.orchestrated,
        model = %settings.model.name,
        "Starting Coralink agent"
    );

    let session = Arc::new(connect_with_retry(&settings).await?);

    let mut registry = ToolRegistry::new();
    let remote_tools = RemoteTool::discover(&session).await?;
    info!(count = remote_tools.len(), "Discovered session tools");
    for tool in remote_tools {
        registry.register(Box::new(tool));
    }
    registry.register(Box::new(EconSolverTool::default()));

    let provider = coralink_providers::from_settings(&settings.model)?;
    let system_prompt = prompt::system_prompt(&settings.coral.agent_id, &registry.definitions());

    let agent = AgentLoop::new(
        provider,
        &settings.model.name,
        settings.model.temperature,
        Arc::new(registry),
        system_prompt,
    )
    .with_max_tokens(settings.model.max_tokens);

    // Returns only on a fatal error; retryable failures back off inside.
    Runner::new(agent).run().await?;
    Ok(())
}

/// Keep trying to open the session while the endpoint is unreachable;
/// give up immediately if the server rejects the registration.
async fn connect_with_retry(settings: &Settings) -> Result<CoralSession, SessionError> {
    loop {
        match CoralSession::connect(&settings.coral).await {
            Ok(session) => return Ok(session),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Connection failed, retrying");
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
            Err(e) => return Err(e),
        }
    }
}
