mod client;
pub mod credentials;
pub mod models;
mod time;
pub mod token;

pub use client::{GoogleCalendar, DEFAULT_API_BASE};
pub use models::{CalendarEvent, CreatedEvent, EventDraft};
pub use token::{SessionProvider, TokenManager};

use crate::error::AssistantResult;
use async_trait::async_trait;

/// Calendar operations the assistant can call as tools
///
/// `list_events` and `search_events` are read-only; `create_event` changes
/// the remote calendar. Failures are returned as-is, nothing is retried.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Events in `[start_date, end_date)` (YYYY-MM-DD), ordered by start time
    async fn list_events(&self, start_date: &str, end_date: &str)
        -> AssistantResult<Vec<CalendarEvent>>;

    /// Events matching a free-text keyword, in service order
    async fn search_events(&self, keyword: &str) -> AssistantResult<Vec<CalendarEvent>>;

    /// Create a single event and return its identifier
    async fn create_event(&self, draft: &EventDraft) -> AssistantResult<CreatedEvent>;
}
