// Export components
pub mod google_calendar;
pub mod knowledge;

// Re-export the pieces the agent works with
pub use google_calendar::{CalendarGateway, GoogleCalendar};
pub use knowledge::KnowledgeRetriever;
