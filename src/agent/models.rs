use super::evaluator::Evaluation;
use crate::components::google_calendar::{CalendarEvent, CreatedEvent};
use serde::{Deserialize, Serialize};

/// What the assistant answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentResponse {
    Events(Vec<CalendarEvent>),
    Created(CreatedEvent),
    Answer { answer: Vec<String>, source: String },
    Message { message: String },
}

impl AgentResponse {
    pub fn message(message: impl Into<String>) -> Self {
        AgentResponse::Message {
            message: message.into(),
        }
    }

    /// True when the response carries a non-empty knowledge answer
    pub fn has_answer(&self) -> bool {
        matches!(self, AgentResponse::Answer { answer, .. } if !answer.is_empty())
    }
}

/// Evaluation placeholder for queries that never reached a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedEvaluation {
    pub status: String,
    pub reason: String,
}

/// Scored evaluation or an early failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentEvaluation {
    Scored(Evaluation),
    Failed(FailedEvaluation),
}

impl AgentEvaluation {
    pub fn failed(reason: impl Into<String>) -> Self {
        AgentEvaluation::Failed(FailedEvaluation {
            status: "failed".to_string(),
            reason: reason.into(),
        })
    }

    pub fn scored(&self) -> Option<&Evaluation> {
        match self {
            AgentEvaluation::Scored(evaluation) => Some(evaluation),
            AgentEvaluation::Failed(_) => None,
        }
    }
}

/// Everything returned for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub response: AgentResponse,
    pub evaluation: AgentEvaluation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_result_shape() {
        let result = AgentResult {
            response: AgentResponse::message("Agent could not determine intent"),
            evaluation: AgentEvaluation::failed("Unknown intent"),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "response": {"message": "Agent could not determine intent"},
                "evaluation": {"status": "failed", "reason": "Unknown intent"}
            })
        );
    }

    #[test]
    fn created_event_shape() {
        let response = AgentResponse::Created(CreatedEvent {
            status: "created".to_string(),
            event_id: "evt1".to_string(),
            summary: Some("Meeting".to_string()),
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "created", "event_id": "evt1", "summary": "Meeting"})
        );
        assert!(!response.has_answer());
    }
}
