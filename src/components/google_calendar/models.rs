use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Start or end of an event as the Calendar API reports it
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Calendar event passed through from the Calendar API
///
/// Fields the assistant does not look at are kept in `extra` so the event
/// is returned to the caller as the service sent it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of an `events.list` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    pub next_page_token: Option<String>,
}

/// Everything needed to create an event from a parsed query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDraft {
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    pub description: String,
    pub location: String,
}

/// Body of an `events.insert` request
#[derive(Debug, Serialize)]
pub(crate) struct NewEvent<'a> {
    pub summary: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub start: EventTime,
    pub end: EventTime,
}

/// Outcome of a successful `create_event`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedEvent {
    pub status: String,
    pub event_id: String,
    pub summary: Option<String>,
}

impl CreatedEvent {
    pub fn from_event(event: CalendarEvent) -> Self {
        Self {
            status: "created".to_string(),
            event_id: event.id,
            summary: event.summary,
        }
    }
}
