use crate::error::{config_error, env_error, AssistantResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/assistant.toml";

/// Main configuration structure for the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Google Calendar ID to operate on
    pub google_calendar_id: String,
    /// OAuth client secrets downloaded from the Google Cloud console
    pub credentials_path: PathBuf,
    /// Where the obtained OAuth token is cached between runs
    pub token_path: PathBuf,
    /// Time zone used for listing and creating events
    pub timezone: String,
    /// Local port receiving the OAuth consent redirect
    pub oauth_redirect_port: u16,
    /// Plain text corpus indexed at startup
    pub knowledge_base_path: PathBuf,
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Characters shared by neighbouring chunks
    pub chunk_overlap: usize,
    /// Number of chunks returned per knowledge question
    pub top_k: usize,
    /// Sentence embedding model used with the `local-embeddings` feature
    pub embedding_model: String,
    /// First day listed for "list events" queries
    pub list_start_date: String,
    /// Exclusive end of the listed range
    pub list_end_date: String,
    /// Keyword used for "search events" queries
    pub search_keyword: String,
    /// Title of events created from a query
    pub event_title: String,
    /// Description of events created from a query
    pub event_description: String,
    /// Location of events created from a query
    pub event_location: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_calendar_id: "primary".to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            timezone: "Asia/Kolkata".to_string(),
            oauth_redirect_port: 8080,
            knowledge_base_path: PathBuf::from("knowledge_base/calendar_assistant_docs.txt"),
            chunk_size: 300,
            chunk_overlap: 50,
            top_k: 2,
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            list_start_date: "2026-01-01".to_string(),
            list_end_date: "2026-01-31".to_string(),
            search_keyword: "Project".to_string(),
            event_title: "Meeting".to_string(),
            event_description: "Created by Agentic Calendar Assistant".to_string(),
            event_location: "Home".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the environment
    pub fn load() -> AssistantResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let config_path =
            env::var("ASSISTANT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            info!("Loading configuration from {}", config_path);
            Self::from_toml_str(&fs::read_to_string(&config_path)?)?
        } else {
            debug!("No configuration file at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> AssistantResult<Self> {
        Ok(toml::from_str::<Config>(content)?)
    }

    /// Override deployment-specific settings from environment variables
    fn apply_env(&mut self) -> AssistantResult<()> {
        if let Ok(calendar_id) = env::var("GOOGLE_CALENDAR_ID") {
            self.google_calendar_id = calendar_id;
        }
        if let Ok(path) = env::var("GOOGLE_CREDENTIALS_PATH") {
            self.credentials_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("GOOGLE_TOKEN_PATH") {
            self.token_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("KNOWLEDGE_BASE_PATH") {
            self.knowledge_base_path = PathBuf::from(path);
        }
        if let Ok(timezone) = env::var("TIMEZONE") {
            self.timezone = timezone;
        }
        if let Ok(port) = env::var("OAUTH_REDIRECT_PORT") {
            self.oauth_redirect_port = port
                .parse::<u16>()
                .map_err(|_| env_error("OAUTH_REDIRECT_PORT"))?;
        }
        Ok(())
    }

    /// Check values that would otherwise only fail deep inside a request
    pub fn validate(&self) -> AssistantResult<()> {
        self.tz()?;

        if self.chunk_size == 0 {
            return Err(config_error("chunk_size must be greater than zero"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(config_error("chunk_overlap must be smaller than chunk_size"));
        }
        if self.top_k == 0 {
            return Err(config_error("top_k must be greater than zero"));
        }

        Ok(())
    }

    /// The configured time zone
    pub fn tz(&self) -> AssistantResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }

    /// Serialize the effective configuration as TOML
    pub fn to_toml_string(&self) -> AssistantResult<String> {
        Ok(toml::to_string(self)?)
    }
}
