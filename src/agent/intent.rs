//! Keyword intent classification.
//!
//! Classification walks an ordered rule table. A rule matches when its gate
//! set (if any) and its trigger set each have at least one word contained
//! in the lower-cased query. The first matching rule wins, so calendar rules
//! take priority over the knowledge rule, and a calendar query with no
//! calendar sub-intent falls through to it.

use super::schedule::{parse_date_time, ParsedSchedule};
use serde::{Deserialize, Serialize};

/// Purpose of a user query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ListEvents,
    SearchEvents,
    CreateEvent,
    KnowledgeQuestion,
    Unknown,
}

pub const CALENDAR_TRIGGERS: &[&str] =
    &["event", "events", "calendar", "meeting", "schedule", "create"];
pub const LIST_TRIGGERS: &[&str] = &["list", "show", "what"];
pub const SEARCH_TRIGGERS: &[&str] = &["search", "find"];
pub const CREATE_TRIGGERS: &[&str] = &["create", "schedule"];
pub const KNOWLEDGE_TRIGGERS: &[&str] = &["what", "explain", "how"];

/// One row of the routing table
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub priority: u8,
    pub gate: Option<&'static [&'static str]>,
    pub triggers: &'static [&'static str],
    pub intent: Intent,
}

impl IntentRule {
    fn matches(&self, query: &str) -> bool {
        self.gate.map_or(true, |gate| contains_any(query, gate))
            && contains_any(query, self.triggers)
    }
}

/// Routing table, lowest priority number first
pub const RULES: &[IntentRule] = &[
    IntentRule {
        priority: 1,
        gate: Some(CALENDAR_TRIGGERS),
        triggers: LIST_TRIGGERS,
        intent: Intent::ListEvents,
    },
    IntentRule {
        priority: 2,
        gate: Some(CALENDAR_TRIGGERS),
        triggers: SEARCH_TRIGGERS,
        intent: Intent::SearchEvents,
    },
    IntentRule {
        priority: 3,
        gate: Some(CALENDAR_TRIGGERS),
        triggers: CREATE_TRIGGERS,
        intent: Intent::CreateEvent,
    },
    IntentRule {
        priority: 4,
        gate: None,
        triggers: KNOWLEDGE_TRIGGERS,
        intent: Intent::KnowledgeQuestion,
    },
];

fn contains_any(query: &str, words: &[&str]) -> bool {
    words.iter().any(|word| query.contains(word))
}

/// A classified query and the parameters extracted for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub intent: Intent,
    /// Present only for `CreateEvent` when the date and time were understood
    pub schedule: Option<ParsedSchedule>,
}

/// Classifies queries with a rule table
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<IntentRule>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(RULES.to_vec())
    }
}

impl IntentRouter {
    pub fn new(mut rules: Vec<IntentRule>) -> Self {
        rules.sort_by_key(|rule| rule.priority);
        Self { rules }
    }

    /// Intent of a query; `Unknown` when no rule matches
    pub fn classify(&self, query: &str) -> Intent {
        let query = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&query))
            .map_or(Intent::Unknown, |rule| rule.intent)
    }

    /// Classify and extract parameters
    pub fn route(&self, query: &str) -> Route {
        let intent = self.classify(query);
        let schedule = match intent {
            Intent::CreateEvent => parse_date_time(query),
            _ => None,
        };
        Route { intent, schedule }
    }
}
