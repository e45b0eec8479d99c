//! # Coralink Core
//!
//! Domain types, traits, and error definitions for the Coralink agent
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every pluggable capability is a trait here: the LLM backend is a
//! [`Provider`], anything the agent can invoke (local solver or remote
//! orchestration operation) is a [`Tool`]. Implementations live in their
//! respective crates, so the reasoning loop never knows whether a tool runs
//! in-process or on the orchestration server.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ConfigError, Error, ProviderError, Result, SessionError, ToolError};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
