//! Error types for the Coralink domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context
//! has its own error variant, and every error classifies itself as
//! retryable or fatal: the outer run loop backs off and retries on the
//! former and exits the process on the latter.

use thiserror::Error;

/// The top-level error type for all Coralink operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Orchestration session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the run loop should back off and retry after this error.
    ///
    /// Configuration and authentication failures will never succeed on a
    /// retry, so they terminate the process instead of looping forever.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Provider(e) => e.is_retryable(),
            Error::Session(e) => e.is_retryable(),
            // A failed tool is reported back to the model inside the
            // reasoning loop; one that escapes to the runner is retried.
            Error::Tool(_) => true,
            Error::Config(_) => false,
            Error::Serialization(_) => true,
            Error::Internal(_) => true,
        }
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            ProviderError::RateLimited { .. } => true,
            ProviderError::AuthenticationFailed(_) => false,
            ProviderError::ModelNotFound(_) => false,
            ProviderError::NotConfigured(_) => false,
            ProviderError::Timeout(_) => true,
            ProviderError::Network(_) => true,
        }
    }
}

/// Errors from the orchestration session (the MCP-over-SSE connection).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to connect to orchestration endpoint: {0}")]
    Connect(String),

    #[error("Orchestration endpoint rejected the session: {0}")]
    Unauthorized(String),

    #[error("Session handshake failed: {0}")]
    Handshake(String),

    #[error("Event stream closed by the server")]
    StreamClosed,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Invalid payload from server: {0}")]
    InvalidPayload(String),
}

impl SessionError {
    pub fn is_retryable(&self) -> bool {
        // A rejected session means bad credentials or a bad agent
        // registration; retrying cannot fix either.
        !matches!(self, SessionError::Unauthorized(_))
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// Configuration errors. Always fatal: the process exits rather than
/// retrying with the same broken environment.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn network_errors_are_retryable() {
        let err = Error::Provider(ProviderError::Network("connection refused".into()));
        assert!(err.is_retryable());

        let err = Error::Session(SessionError::Connect("unreachable".into()));
        assert!(err.is_retryable());
    }

    #[test]
    fn auth_and_config_errors_are_fatal() {
        let err = Error::Provider(ProviderError::AuthenticationFailed("bad key".into()));
        assert!(!err.is_retryable());

        let err = Error::Config(ConfigError::MissingVar("CORAL_SSE_URL"));
        assert!(!err.is_retryable());

        let err = Error::Session(SessionError::Unauthorized("unknown agent id".into()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_retryable_client_errors_not() {
        let server = ProviderError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        };
        assert!(server.is_retryable());

        let client = ProviderError::ApiError {
            status_code: 400,
            message: "bad request".into(),
        };
        assert!(!client.is_retryable());
    }
}
