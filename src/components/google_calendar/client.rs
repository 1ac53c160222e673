use super::models::{CalendarEvent, CreatedEvent, EventDraft, EventTime, EventsPage, NewEvent};
use super::time::{day_start_rfc3339, zoned_timestamp};
use super::token::SessionProvider;
use super::CalendarGateway;
use crate::config::Config;
use crate::error::{google_calendar_error, AssistantResult};
use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Calendar API root
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar v3 REST client
pub struct GoogleCalendar {
    calendar_id: String,
    tz: Tz,
    api_base: String,
    client: Client,
    session: Arc<dyn SessionProvider>,
}

impl GoogleCalendar {
    pub fn new(
        config: &Config,
        client: Client,
        session: Arc<dyn SessionProvider>,
    ) -> AssistantResult<Self> {
        Ok(Self {
            calendar_id: config.google_calendar_id.clone(),
            tz: config.tz()?,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
            session,
        })
    }

    /// Point the client at another API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn events_url(&self) -> AssistantResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base cannot take a path"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);

        Ok(url)
    }

    /// Run `events.list` with the given parameters, following every page
    async fn fetch_all(&self, params: &[(&str, String)]) -> AssistantResult<Vec<CalendarEvent>> {
        let access_token = self.session.access_token().await?;
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.events_url()?;
            {
                let mut query = url.query_pairs_mut();
                for (key, value) in params {
                    query.append_pair(key, value);
                }
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            debug!(%url, "Fetching calendar events");
            let response = self
                .client
                .get(url)
                .bearer_auth(&access_token)
                .send()
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

            let page: EventsPage = read_json(response, "fetch events").await?;
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendar {
    async fn list_events(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> AssistantResult<Vec<CalendarEvent>> {
        let params = [
            ("timeMin", day_start_rfc3339(start_date, &self.tz)?),
            ("timeMax", day_start_rfc3339(end_date, &self.tz)?),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("timeZone", self.tz.name().to_string()),
        ];

        let events = self.fetch_all(&params).await?;
        info!(
            "Listed {} events between {} and {}",
            events.len(),
            start_date,
            end_date
        );
        Ok(events)
    }

    async fn search_events(&self, keyword: &str) -> AssistantResult<Vec<CalendarEvent>> {
        let params = [
            ("q", keyword.to_string()),
            ("singleEvents", "true".to_string()),
        ];

        let events = self.fetch_all(&params).await?;
        info!("Found {} events matching '{}'", events.len(), keyword);
        Ok(events)
    }

    async fn create_event(&self, draft: &EventDraft) -> AssistantResult<CreatedEvent> {
        let start = zoned_timestamp(&draft.date, &draft.start_time, &self.tz)?;
        let end = zoned_timestamp(&draft.date, &draft.end_time, &self.tz)?;

        let body = NewEvent {
            summary: &draft.title,
            description: &draft.description,
            location: &draft.location,
            start: EventTime {
                date_time: Some(start.to_rfc3339()),
                date: None,
                time_zone: Some(self.tz.name().to_string()),
            },
            end: EventTime {
                date_time: Some(end.to_rfc3339()),
                date: None,
                time_zone: Some(self.tz.name().to_string()),
            },
        };

        let access_token = self.session.access_token().await?;
        let response = self
            .client
            .post(self.events_url()?)
            .bearer_auth(&access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        let created: CalendarEvent = read_json(response, "create event").await?;
        info!("Created event {} on {}", created.id, draft.date);
        Ok(CreatedEvent::from_event(created))
    }
}

/// Check the status and decode a JSON body
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    action: &str,
) -> AssistantResult<T> {
    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(google_calendar_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| google_calendar_error(&format!("Failed to parse {} response: {}", action, e)))
}
