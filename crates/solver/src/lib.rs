//! Economics problem solver for Coralink.
//!
//! A classify-then-dispatch pipeline: [`Classifier`] maps free-text input
//! to exactly one [`Topic`], [`Responder`] renders a structured explanation
//! for that topic, and [`EconSolverTool`] packages the pipeline as a
//! `coralink_core::Tool` for the reasoning loop.

pub mod formulas;
pub mod responder;
pub mod tool;
pub mod topic;

pub use responder::Responder;
pub use tool::EconSolverTool;
pub use topic::{Classifier, KeywordClassifier, Topic};

/// Classify and answer a problem with the default pipeline.
pub fn solve(problem: &str) -> String {
    let topic = KeywordClassifier.classify(problem);
    Responder::new().respond(problem, topic)
}
