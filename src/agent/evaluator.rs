//! Groundedness scoring.
//!
//! A fixed rule table, not a learned model: the score only depends on the
//! source and on whether retrieved context or tool usage backs the response.

use super::models::AgentResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KNOWLEDGE_BASE: &str = "knowledge_base";
pub const CALENDAR: &str = "calendar";

const KNOWLEDGE_PASS_SCORE: f32 = 0.95;
const KNOWLEDGE_FAIL_SCORE: f32 = 0.3;
const CALENDAR_PASS_SCORE: f32 = 0.9;
const CALENDAR_FAIL_SCORE: f32 = 0.4;

/// Verdict of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvaluationResult {
    Pass,
    Fail,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationResult::Pass => write!(f, "PASS"),
            EvaluationResult::Fail => write!(f, "FAIL"),
        }
    }
}

/// How well a response is supported by evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub confidence_score: f32,
    pub explanation: String,
    pub references: Vec<String>,
    pub result: EvaluationResult,
}

impl Evaluation {
    fn fail(confidence_score: f32, explanation: &str) -> Self {
        Self {
            confidence_score,
            explanation: explanation.to_string(),
            references: Vec::new(),
            result: EvaluationResult::Fail,
        }
    }

    fn pass(confidence_score: f32, explanation: &str, references: &[String]) -> Self {
        Self {
            confidence_score,
            explanation: explanation.to_string(),
            references: references.to_vec(),
            result: EvaluationResult::Pass,
        }
    }

    pub fn passed(&self) -> bool {
        self.result == EvaluationResult::Pass
    }
}

/// Score a response by its source and supporting evidence
///
/// `source` is `"knowledge_base"` or `"calendar"`; anything else fails with
/// "Unknown source type.". The query does not influence the score.
pub fn evaluate(
    _query: &str,
    response: &AgentResponse,
    source: &str,
    retrieved_context: Option<&[String]>,
    tools_used: Option<&[String]>,
) -> Evaluation {
    match source {
        KNOWLEDGE_BASE => match retrieved_context {
            Some(context) if !context.is_empty() && response.has_answer() => Evaluation::pass(
                KNOWLEDGE_PASS_SCORE,
                "The response is fully supported by retrieved documents from the knowledge base.",
                context,
            ),
            _ => Evaluation::fail(
                KNOWLEDGE_FAIL_SCORE,
                "The response lacks sufficient retrieved context.",
            ),
        },
        CALENDAR => match tools_used {
            Some(tools) if !tools.is_empty() => Evaluation::pass(
                CALENDAR_PASS_SCORE,
                "The response is supported by Google Calendar data retrieved using calendar tools.",
                tools,
            ),
            _ => Evaluation::fail(
                CALENDAR_FAIL_SCORE,
                "No calendar tool usage was detected to support the response.",
            ),
        },
        _ => Evaluation::fail(0.0, "Unknown source type."),
    }
}
