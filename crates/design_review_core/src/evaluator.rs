//! crates/design_review_core/src/evaluator.rs
//!
//! Turns a completed draft into a prompt, sends it to the text-generation port,
//! and validates the reply into an `Evaluation`.

use crate::domain::{DesignDraft, Evaluation};
use crate::ports::{PortError, TextGenerationService};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The single message shown to users for any evaluation failure.
pub const EVALUATION_FAILURE_MESSAGE: &str =
    "Failed to get an evaluation from the AI. Please check your API key and try again.";

const PROMPT_TEMPLATE: &str = r#"You are an expert software architect and system design interviewer reviewing a candidate's proposal.
Your task is to evaluate the system design based on the provided details. Provide a score from 1.0 to 10.0
(where 1.0 is poor and 10.0 is excellent) and constructive feedback. The feedback should be in Markdown format.

Here is the user's design proposal:

**1. Problem Definition:**
{problem}

**2. Requirements & Constraints:**
{requirements}

**3. Architecture Sketch:**
{architecture}

**4. Design Decisions & Trade-offs:**
{decisions}

Evaluate this design on its coherence, completeness, scalability, reliability, fault tolerance, and feasibility.
Identify its strengths and weaknesses. Be specific in your feedback.

Return your evaluation ONLY as a JSON object of the form {"score": number, "feedback": string}."#;

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Text generation failed: {0}")]
    Transport(#[from] PortError),
    #[error("Invalid response format from AI model: {0}")]
    MalformedResponse(String),
}

impl EvaluationError {
    /// What the user sees. The underlying cause goes to the log instead.
    pub fn user_message(&self) -> &'static str {
        EVALUATION_FAILURE_MESSAGE
    }
}

/// Renders the evaluation prompt. Field values are embedded verbatim.
pub fn render_prompt(draft: &DesignDraft) -> String {
    // Substitute the template's placeholders in one pass so that user text
    // containing "{...}" is never re-expanded.
    let mut out = String::with_capacity(PROMPT_TEMPLATE.len() + 256);
    let mut rest = PROMPT_TEMPLATE;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = [
            ("{problem}", draft.problem.as_str()),
            ("{requirements}", draft.requirements.as_str()),
            ("{architecture}", draft.architecture.as_str()),
            ("{decisions}", draft.decisions.as_str()),
        ]
        .into_iter()
        .find(|(placeholder, _)| tail.starts_with(placeholder));

        match value {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// JSON Schema for the requested response shape.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": {
                "type": "number",
                "description": "A score from 1.0 to 10.0 evaluating the system design."
            },
            "feedback": {
                "type": "string",
                "description": "Detailed, constructive feedback in Markdown format."
            }
        },
        "required": ["score", "feedback"]
    })
}

/// Parses model output into an `Evaluation`.
///
/// The text must be a JSON object with a numeric `score` and a string
/// `feedback`; anything else is rejected whole.
pub fn parse_evaluation(text: &str) -> Result<Evaluation, EvaluationError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| EvaluationError::MalformedResponse(format!("not valid JSON: {e}")))?;

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .ok_or_else(|| EvaluationError::MalformedResponse("`score` is not a number".to_string()))?;

    let feedback = value
        .get("feedback")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            EvaluationError::MalformedResponse("`feedback` is not a string".to_string())
        })?;

    if !(1.0..=10.0).contains(&score) {
        warn!("Evaluation score {} is outside the expected 1.0-10.0 range", score);
    }

    Ok(Evaluation {
        score,
        feedback: feedback.to_string(),
    })
}

//=========================================================================================
// The Client
//=========================================================================================

#[derive(Clone)]
pub struct Evaluator {
    generator: Arc<dyn TextGenerationService>,
}

impl Evaluator {
    pub fn new(generator: Arc<dyn TextGenerationService>) -> Self {
        Self { generator }
    }

    /// Makes exactly one call to the generator; retrying is the caller's decision.
    ///
    /// The draft is assumed complete; emptiness is checked by the wizard.
    pub async fn evaluate(&self, draft: &DesignDraft) -> Result<Evaluation, EvaluationError> {
        let prompt = render_prompt(draft);
        let result = match self.generator.generate_json(&prompt, &response_schema()).await {
            Ok(text) => parse_evaluation(&text),
            Err(e) => Err(EvaluationError::from(e)),
        };

        match &result {
            Ok(evaluation) => info!("Received evaluation with score {:.1}", evaluation.score),
            Err(e) => error!("Error evaluating design: {}", e),
        }
        result
    }
}
