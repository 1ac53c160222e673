use async_trait::async_trait;
use calendar_assistant::agent::{AgentEvaluation, AgentResponse, Assistant, EvaluationResult};
use calendar_assistant::components::google_calendar::models::EventTime;
use calendar_assistant::components::google_calendar::{
    CalendarEvent, CalendarGateway, CreatedEvent, EventDraft,
};
use calendar_assistant::components::knowledge::{ChunkConfig, HashingEmbedder, KnowledgeRetriever};
use calendar_assistant::config::Config;
use calendar_assistant::error::{google_calendar_error, AssistantResult};
use calendar_assistant::startup::run_session;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

/// A call received by the mock calendar
#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(String, String),
    Search(String),
    Create(EventDraft),
}

/// Mock implementation of the calendar gateway for testing
#[derive(Default)]
struct MockCalendar {
    events: Vec<CalendarEvent>,
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl MockCalendar {
    /// Create a new mock with predefined events
    fn new() -> Self {
        let events = vec![
            CalendarEvent {
                id: "event1".to_string(),
                summary: Some("Project kickoff".to_string()),
                start: Some(EventTime {
                    date_time: Some("2026-01-05T10:00:00+05:30".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            CalendarEvent {
                id: "event2".to_string(),
                summary: Some("Project review".to_string()),
                start: Some(EventTime {
                    date: Some("2026-01-20".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ];

        Self {
            events,
            ..Default::default()
        }
    }

    /// A mock whose every call fails like an unreachable service
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> AssistantResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(google_calendar_error("Failed to fetch events: HTTP 503"));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarGateway for MockCalendar {
    async fn list_events(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> AssistantResult<Vec<CalendarEvent>> {
        self.record(Call::List(start_date.to_string(), end_date.to_string()))?;
        Ok(self.events.clone())
    }

    async fn search_events(&self, keyword: &str) -> AssistantResult<Vec<CalendarEvent>> {
        self.record(Call::Search(keyword.to_string()))?;
        Ok(self
            .events
            .iter()
            .filter(|event| {
                event
                    .summary
                    .as_deref()
                    .is_some_and(|summary| summary.contains(keyword))
            })
            .cloned()
            .collect())
    }

    async fn create_event(&self, draft: &EventDraft) -> AssistantResult<CreatedEvent> {
        self.record(Call::Create(draft.clone()))?;
        Ok(CreatedEvent {
            status: "created".to_string(),
            event_id: "new-event".to_string(),
            summary: Some(draft.title.clone()),
        })
    }
}

const CORPUS: &str = "The calendar assistant routes each query with keyword rules.\n\n\
Retrieval augmented generation looks up relevant passages before answering.\n\n\
Created events are stored in Google Calendar in the configured time zone.";

/// Build an assistant over a temporary corpus and the given calendar
async fn assistant_with(calendar: Arc<MockCalendar>) -> (Assistant, NamedTempFile) {
    let mut corpus = NamedTempFile::new().unwrap();
    corpus.write_all(CORPUS.as_bytes()).unwrap();

    let config = Config::default();
    let retriever = KnowledgeRetriever::build(
        corpus.path(),
        ChunkConfig {
            chunk_size: 80,
            chunk_overlap: 10,
        },
        Arc::new(HashingEmbedder::default()),
    )
    .await
    .unwrap();

    let assistant = Assistant::new(Arc::new(config), Arc::new(retriever), calendar);
    (assistant, corpus)
}

/// Input lines as the stdin reader would deliver them, then end of input
fn lines(input: &[&str]) -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(input.len().max(1));
    for line in input {
        sender.try_send(line.to_string()).unwrap();
    }
    receiver
}

fn scored(evaluation: &AgentEvaluation) -> &calendar_assistant::agent::Evaluation {
    evaluation.scored().expect("expected a scored evaluation")
}

#[tokio::test]
async fn test_list_events_uses_configured_range() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant.decide_and_act("Show my events").await.unwrap();

    assert_eq!(
        calendar.calls(),
        vec![Call::List("2026-01-01".to_string(), "2026-01-31".to_string())]
    );
    match &result.response {
        AgentResponse::Events(events) => assert_eq!(events.len(), 2),
        other => panic!("unexpected response: {:?}", other),
    }

    let evaluation = scored(&result.evaluation);
    assert_eq!(evaluation.confidence_score, 0.9);
    assert_eq!(evaluation.result, EvaluationResult::Pass);
    assert_eq!(evaluation.references, vec!["list_events".to_string()]);
}

#[tokio::test]
async fn test_empty_calendar_still_passes() {
    let calendar = Arc::new(MockCalendar::default());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant.decide_and_act("list calendar").await.unwrap();

    assert_eq!(result.response, AgentResponse::Events(Vec::new()));
    assert!(scored(&result.evaluation).passed());
}

#[tokio::test]
async fn test_search_uses_configured_keyword() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant
        .decide_and_act("Find the review meeting")
        .await
        .unwrap();

    assert_eq!(calendar.calls(), vec![Call::Search("Project".to_string())]);
    assert_eq!(
        scored(&result.evaluation).references,
        vec!["search_events".to_string()]
    );
}

#[tokio::test]
async fn test_create_event_from_query() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant
        .decide_and_act("Create a meeting on January 21st from 10 AM to 11 AM")
        .await
        .unwrap();

    let expected = EventDraft {
        title: "Meeting".to_string(),
        date: "2026-01-21".to_string(),
        start_time: "10:00".to_string(),
        end_time: "11:00".to_string(),
        description: "Created by Agentic Calendar Assistant".to_string(),
        location: "Home".to_string(),
    };
    assert_eq!(calendar.calls(), vec![Call::Create(expected)]);

    match &result.response {
        AgentResponse::Created(created) => {
            assert_eq!(created.status, "created");
            assert_eq!(created.event_id, "new-event");
        }
        other => panic!("unexpected response: {:?}", other),
    }
    assert_eq!(
        scored(&result.evaluation).references,
        vec!["create_event".to_string()]
    );
}

#[tokio::test]
async fn test_create_without_date_is_not_sent() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant
        .decide_and_act("Create a meeting tomorrow")
        .await
        .unwrap();

    assert!(calendar.calls().is_empty());
    assert_eq!(
        result.response,
        AgentResponse::message("Could not understand date/time. Please try a clearer format.")
    );
    assert!(result.evaluation.scored().is_none());

    let json = serde_json::to_value(&result.evaluation).unwrap();
    assert_eq!(json["status"], "failed");
}

#[tokio::test]
async fn test_unknown_intent() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant.decide_and_act("hello there").await.unwrap();

    assert!(calendar.calls().is_empty());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({
            "response": {"message": "Agent could not determine intent"},
            "evaluation": {"status": "failed", "reason": "Unknown intent"}
        })
    );
}

#[tokio::test]
async fn test_knowledge_question_is_grounded() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant
        .decide_and_act("Explain retrieval augmented generation")
        .await
        .unwrap();

    assert!(calendar.calls().is_empty());
    let answer = match &result.response {
        AgentResponse::Answer { answer, source } => {
            assert_eq!(source, "knowledge_base");
            answer.clone()
        }
        other => panic!("unexpected response: {:?}", other),
    };
    assert_eq!(answer.len(), 2);
    assert!(answer[0].starts_with("Retrieval augmented generation"));

    let evaluation = scored(&result.evaluation);
    assert_eq!(evaluation.confidence_score, 0.95);
    assert_eq!(evaluation.result, EvaluationResult::Pass);
    assert_eq!(evaluation.references, answer);
}

#[tokio::test]
async fn test_question_without_calendar_words_passes() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant
        .decide_and_act("What is the capital concept behind retrieval augmented generation")
        .await
        .unwrap();

    assert!(calendar.calls().is_empty());
    assert!(result.response.has_answer());
    assert!(scored(&result.evaluation).passed());
}

#[tokio::test]
async fn test_calendar_failure_is_an_error() {
    let calendar = Arc::new(MockCalendar::failing());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let result = assistant.decide_and_act("what events do I have").await;

    assert!(result.is_err());
    assert_eq!(calendar.calls().len(), 1);
}

#[tokio::test]
async fn test_session_prints_results_until_exit() {
    let calendar = Arc::new(MockCalendar::new());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let input = lines(&["show events", "", "EXIT", "list events"]);
    let mut output = Vec::new();
    run_session(&assistant, input, &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with("=== Agentic Calendar Assistant ==="));
    assert!(output.contains("Type your query below (type 'exit' to quit)"));
    assert_eq!(output.matches("[Agent Result]").count(), 1);
    assert!(output.contains("\"id\": \"event1\""));
    assert!(output.contains(&"-".repeat(50)));
    assert!(output.trim_end().ends_with("Exiting Agentic Calendar Assistant."));

    // Lines after "exit" are never read
    assert_eq!(calendar.calls().len(), 1);
}

#[tokio::test]
async fn test_session_survives_failed_query() {
    let calendar = Arc::new(MockCalendar::failing());
    let (assistant, _corpus) = assistant_with(Arc::clone(&calendar)).await;

    let input = lines(&["show events", "search events"]);
    let mut output = Vec::new();
    run_session(&assistant, input, &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(output.matches("Request failed:").count(), 2);
    assert!(!output.contains("[Agent Result]"));
    assert!(output.trim_end().ends_with("Exiting Agentic Calendar Assistant."));
    assert_eq!(calendar.calls().len(), 2);
}
