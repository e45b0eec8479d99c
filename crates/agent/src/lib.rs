//! The Coralink agent: a tool-calling reasoning loop wrapped in a
//! retry-forever runner.
//!
//! [`AgentLoop`] drives one conversation to completion (LLM turn, tool
//! execution, repeat). [`Runner`] invokes it in an endless cycle, backing
//! off on retryable failures and exiting only on fatal ones.

pub mod loop_runner;
pub mod prompt;
pub mod runner;

pub use loop_runner::AgentLoop;
pub use runner::Runner;
