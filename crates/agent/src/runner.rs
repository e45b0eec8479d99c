//! The outer run loop.
//!
//! Each cycle seeds a fresh conversation with the standing instruction and
//! hands it to the reasoning loop. Successful cycles are followed by a
//! short pause, retryable failures by a longer backoff, and fatal failures
//! (bad credentials, broken configuration) end the loop so the process can
//! exit non-zero instead of retrying forever.

use crate::loop_runner::AgentLoop;
use crate::prompt::CYCLE_INSTRUCTION;
use coralink_core::error::Error;
use coralink_core::message::{Conversation, Message};
use std::time::Duration;
use tracing::{error, info};

const OK_DELAY: Duration = Duration::from_secs(1);
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct Runner {
    agent: AgentLoop,
    ok_delay: Duration,
    error_backoff: Duration,
}

impl Runner {
    pub fn new(agent: AgentLoop) -> Self {
        Self {
            agent,
            ok_delay: OK_DELAY,
            error_backoff: ERROR_BACKOFF,
        }
    }

    /// Override the pause durations (tests use zero).
    pub fn with_delays(mut self, ok_delay: Duration, error_backoff: Duration) -> Self {
        self.ok_delay = ok_delay;
        self.error_backoff = error_backoff;
        self
    }

    /// Run until the process is killed or a fatal error occurs.
    pub async fn run(&self) -> Result<(), Error> {
        self.run_cycles(u64::MAX).await.map(|_| ())
    }

    /// Run at most `max_cycles` cycles. Returns the number of cycles that
    /// ran (counting failed-but-retryable ones), or the first fatal error.
    pub async fn run_cycles(&self, max_cycles: u64) -> Result<u64, Error> {
        let mut completed = 0;

        while completed < max_cycles {
            info!(cycle = completed + 1, "Starting agent invocation");

            match self.cycle().await {
                Ok(()) => {
                    completed += 1;
                    info!("Completed agent invocation, restarting loop");
                    tokio::time::sleep(self.ok_delay).await;
                }
                Err(e) if e.is_retryable() => {
                    completed += 1;
                    error!(error = %e, "Error in agent loop, backing off");
                    tokio::time::sleep(self.error_backoff).await;
                }
                Err(e) => {
                    error!(error = %e, "Fatal error in agent loop, shutting down");
                    return Err(e);
                }
            }
        }

        Ok(completed)
    }

    async fn cycle(&self) -> Result<(), Error> {
        let mut conversation = Conversation::new();
        conversation.push(Message::user(CYCLE_INSTRUCTION));
        self.agent.process(&mut conversation).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coralink_core::error::ProviderError;
    use coralink_core::message::Message as CoreMessage;
    use coralink_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use coralink_core::tool::ToolRegistry;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// A provider whose every call produces the same outcome.
    struct FixedProvider {
        error: Option<ProviderError>,
        calls: AtomicU64,
    }

    impl FixedProvider {
        fn ok() -> Self {
            Self {
                error: None,
                calls: AtomicU64::new(0),
            }
        }

        fn failing(error: ProviderError) -> Self {
            Self {
                error: Some(error),
                calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.error {
                Some(e) => Err(e.clone()),
                None => Ok(ProviderResponse {
                    message: CoreMessage::assistant("cycle done"),
                    usage: None,
                    model: "fixed".into(),
                }),
            }
        }
    }

    fn runner(provider: FixedProvider) -> Runner {
        let agent = AgentLoop::new(
            Arc::new(provider),
            "fixed",
            0.1,
            Arc::new(ToolRegistry::new()),
            "test prompt",
        );
        Runner::new(agent).with_delays(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn successful_cycles_keep_going() {
        let runner = runner(FixedProvider::ok());
        let completed = runner.run_cycles(5).await.unwrap();
        assert_eq!(completed, 5);
    }

    #[tokio::test]
    async fn retryable_failures_never_terminate_the_loop() {
        // A reasoning component that always fails with a transport error:
        // the loop keeps cycling for as long as we let it.
        let runner = runner(FixedProvider::failing(ProviderError::Network(
            "connection reset".into(),
        )));
        let completed = runner.run_cycles(10).await.unwrap();
        assert_eq!(completed, 10);
    }

    #[tokio::test]
    async fn rate_limits_are_retryable() {
        let runner = runner(FixedProvider::failing(ProviderError::RateLimited {
            retry_after_secs: 1,
        }));
        let completed = runner.run_cycles(3).await.unwrap();
        assert_eq!(completed, 3);
    }

    #[tokio::test]
    async fn fatal_errors_stop_the_loop() {
        let runner = runner(FixedProvider::failing(ProviderError::AuthenticationFailed(
            "invalid key".into(),
        )));
        let err = runner.run_cycles(10).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(matches!(
            err,
            Error::Provider(ProviderError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn fatal_error_surfaces_on_first_cycle() {
        let provider = FixedProvider::failing(ProviderError::ModelNotFound("gpt-0".into()));
        let calls = Arc::new(AtomicU64::new(0));
        // Wrap to count calls through the shared Arc.
        struct Counting {
            inner: FixedProvider,
            calls: Arc<AtomicU64>,
        }
        #[async_trait::async_trait]
        impl Provider for Counting {
            fn name(&self) -> &str {
                "counting"
            }
            async fn complete(
                &self,
                request: ProviderRequest,
            ) -> Result<ProviderResponse, ProviderError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.inner.complete(request).await
            }
        }

        let agent = AgentLoop::new(
            Arc::new(Counting {
                inner: provider,
                calls: Arc::clone(&calls),
            }),
            "fixed",
            0.1,
            Arc::new(ToolRegistry::new()),
            "test prompt",
        );
        let runner = Runner::new(agent).with_delays(Duration::ZERO, Duration::ZERO);

        assert!(runner.run_cycles(10).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1, "no retry after fatal");
    }
}
