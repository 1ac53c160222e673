use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the assistant
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(assistant::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(assistant::config))]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(assistant::google_calendar))]
    GoogleCalendar(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(
        code(assistant::auth),
        help("run `get_calendar_token` to authorize the assistant again")
    )]
    Auth(String),

    #[error("Knowledge base error: {0}")]
    #[diagnostic(code(assistant::knowledge))]
    Knowledge(String),

    #[error("Embedding error: {0}")]
    #[diagnostic(code(assistant::embedding))]
    Embedding(String),

    #[error(transparent)]
    #[diagnostic(code(assistant::io))]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(assistant::http))]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(assistant::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(assistant::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AssistantResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid value for environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create knowledge base errors
pub fn knowledge_error(message: &str) -> Error {
    Error::Knowledge(message.to_string())
}

/// Helper to create embedding errors
pub fn embedding_error(message: &str) -> Error {
    Error::Embedding(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
