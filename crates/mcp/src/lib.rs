//! MCP-over-SSE session client for Coral-style orchestration servers.
//!
//! The orchestration endpoint coordinates communication between agents and
//! advertises its operations (`wait_for_mentions`, `send_message`, ...) as
//! MCP tools. This crate opens the session, performs the handshake, and
//! wraps each advertised operation in a [`RemoteTool`] implementing
//! `coralink_core::Tool`, so the reasoning loop treats remote operations
//! exactly like local ones.

pub mod remote_tool;
pub mod rpc;
pub mod session;
pub mod sse;

pub use remote_tool::RemoteTool;
pub use rpc::McpToolInfo;
pub use session::CoralSession;
