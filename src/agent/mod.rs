pub mod evaluator;
pub mod intent;
pub mod models;
pub mod schedule;

pub use evaluator::{evaluate, Evaluation, EvaluationResult};
pub use intent::{Intent, IntentRouter, Route};
pub use models::{AgentEvaluation, AgentResponse, AgentResult};
pub use schedule::{parse_date_time, ParsedSchedule};

use crate::components::google_calendar::{CalendarGateway, EventDraft};
use crate::components::knowledge::KnowledgeRetriever;
use crate::config::Config;
use crate::error::AssistantResult;
use evaluator::{CALENDAR, KNOWLEDGE_BASE};
use rust_i18n::t;
use std::sync::Arc;
use tracing::info;

/// Routes queries to the calendar or the knowledge base and scores the answer
pub struct Assistant {
    config: Arc<Config>,
    router: IntentRouter,
    retriever: Arc<KnowledgeRetriever>,
    calendar: Arc<dyn CalendarGateway>,
}

impl Assistant {
    pub fn new(
        config: Arc<Config>,
        retriever: Arc<KnowledgeRetriever>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Self {
        Self {
            config,
            router: IntentRouter::default(),
            retriever,
            calendar,
        }
    }

    /// Handle one query end to end
    ///
    /// Parse and routing failures come back as structured results; calendar,
    /// network and authorization failures are returned as `Err`.
    pub async fn decide_and_act(&self, query: &str) -> AssistantResult<AgentResult> {
        info!("Received query: {}", query);

        let route = self.router.route(query);
        match route.intent {
            Intent::ListEvents => self.list_events(query).await,
            Intent::SearchEvents => self.search_events(query).await,
            Intent::CreateEvent => self.create_event(query, route.schedule).await,
            Intent::KnowledgeQuestion => self.answer_question(query).await,
            Intent::Unknown => {
                info!("Reasoning: no intent matched");
                Ok(AgentResult {
                    response: AgentResponse::message(t!("intent_not_determined")),
                    evaluation: AgentEvaluation::failed(t!("unknown_intent_reason")),
                })
            }
        }
    }

    async fn list_events(&self, query: &str) -> AssistantResult<AgentResult> {
        info!("Reasoning: user wants to see events");
        info!("Action: calling list_events tool");

        let events = self
            .calendar
            .list_events(&self.config.list_start_date, &self.config.list_end_date)
            .await?;

        Ok(calendar_result(
            query,
            AgentResponse::Events(events),
            "list_events",
        ))
    }

    async fn search_events(&self, query: &str) -> AssistantResult<AgentResult> {
        info!("Reasoning: user wants to search events");
        info!("Action: calling search_events tool");

        let events = self
            .calendar
            .search_events(&self.config.search_keyword)
            .await?;

        Ok(calendar_result(
            query,
            AgentResponse::Events(events),
            "search_events",
        ))
    }

    async fn create_event(
        &self,
        query: &str,
        schedule: Option<ParsedSchedule>,
    ) -> AssistantResult<AgentResult> {
        info!("Reasoning: user wants to create an event");

        let Some(schedule) = schedule else {
            info!("Reasoning: date/time not understood");
            return Ok(AgentResult {
                response: AgentResponse::message(t!("date_time_not_understood")),
                evaluation: AgentEvaluation::failed(t!("date_time_not_understood_reason")),
            });
        };

        info!("Action: calling create_event tool");
        let draft = EventDraft {
            title: self.config.event_title.clone(),
            date: schedule.date,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            description: self.config.event_description.clone(),
            location: self.config.event_location.clone(),
        };
        let created = self.calendar.create_event(&draft).await?;

        Ok(calendar_result(
            query,
            AgentResponse::Created(created),
            "create_event",
        ))
    }

    async fn answer_question(&self, query: &str) -> AssistantResult<AgentResult> {
        info!("Reasoning: knowledge-based question detected");

        let context = self
            .retriever
            .retrieve_context(query, self.config.top_k)
            .await?;

        let response = AgentResponse::Answer {
            answer: context.clone(),
            source: KNOWLEDGE_BASE.to_string(),
        };
        let evaluation = evaluate(query, &response, KNOWLEDGE_BASE, Some(context.as_slice()), None);

        Ok(AgentResult {
            response,
            evaluation: AgentEvaluation::Scored(evaluation),
        })
    }
}

fn calendar_result(query: &str, response: AgentResponse, tool: &str) -> AgentResult {
    let tools_used = vec![tool.to_string()];
    let evaluation = evaluate(query, &response, CALENDAR, None, Some(tools_used.as_slice()));
    AgentResult {
        response,
        evaluation: AgentEvaluation::Scored(evaluation),
    }
}
