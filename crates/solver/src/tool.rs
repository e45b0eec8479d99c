//! The solver packaged as an agent tool.

use crate::responder::Responder;
use crate::topic::{Classifier, KeywordClassifier};
use async_trait::async_trait;
use coralink_core::error::ToolError;
use coralink_core::tool::{Tool, ToolResult};

/// Local tool the reasoning loop calls to answer economics problems.
pub struct EconSolverTool {
    classifier: Box<dyn Classifier>,
    responder: Responder,
}

impl EconSolverTool {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            responder: Responder::new(),
        }
    }
}

impl Default for EconSolverTool {
    fn default() -> Self {
        Self::new(Box::new(KeywordClassifier))
    }
}

#[async_trait]
impl Tool for EconSolverTool {
    fn name(&self) -> &str {
        "economics_solver"
    }

    fn description(&self) -> &str {
        "Solves high school economics problems with step-by-step explanations. \
         Can handle supply/demand analysis, market equilibrium, elasticity \
         calculations, GDP analysis, and other micro/macroeconomic concepts."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "problem": {
                    "type": "string",
                    "description": "The economics problem or question to solve"
                }
            },
            "required": ["problem"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let problem = arguments["problem"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'problem' argument".into()))?;

        let topic = self.classifier.classify(problem);
        tracing::debug!(topic = %topic, "Classified problem");
        let output = self.responder.respond(problem, topic);

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::Topic;

    #[tokio::test]
    async fn solves_an_elasticity_problem() {
        let tool = EconSolverTool::default();
        let result = tool
            .execute(serde_json::json!({
                "problem": "Price elasticity when quantity goes from 100 to 80 as price goes from 10 to 12?"
            }))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("ELASTICITY ANALYSIS"));
        assert!(result.output.contains("Numerical Calculation"));
    }

    #[tokio::test]
    async fn missing_problem_argument_is_invalid() {
        let tool = EconSolverTool::default();
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn custom_classifier_is_honored() {
        struct AlwaysGdp;
        impl Classifier for AlwaysGdp {
            fn classify(&self, _problem: &str) -> Topic {
                Topic::Gdp
            }
        }

        let tool = EconSolverTool::new(Box::new(AlwaysGdp));
        let result = tool
            .execute(serde_json::json!({"problem": "anything at all"}))
            .await
            .unwrap();
        assert!(result.output.contains("GDP ANALYSIS"));
    }

    #[test]
    fn tool_definition_names_the_solver() {
        let tool = EconSolverTool::default();
        let def = tool.to_definition();
        assert_eq!(def.name, "economics_solver");
        assert_eq!(def.parameters["required"][0], "problem");
    }
}
