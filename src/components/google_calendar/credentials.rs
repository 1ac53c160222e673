use crate::error::{auth_error, AssistantResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// OAuth client settings from a downloaded `credentials.json`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The file wraps the secrets in an `installed` or `web` section
#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Read client secrets from disk
    pub fn from_file(path: &Path) -> AssistantResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            auth_error(&format!(
                "Google Calendar credentials not provided ({}): {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse the JSON document Google hands out for OAuth clients
    pub fn from_json(content: &str) -> AssistantResult<Self> {
        let file: SecretsFile = serde_json::from_str(content)
            .map_err(|e| auth_error(&format!("Malformed client secrets: {}", e)))?;

        file.installed
            .or(file.web)
            .ok_or_else(|| auth_error("Client secrets have neither an 'installed' nor a 'web' section"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_installed_application() {
        let secrets = ClientSecrets::from_json(
            r#"{"installed": {
                "client_id": "id.apps.googleusercontent.com",
                "client_secret": "shh",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "redirect_uris": ["http://localhost"]
            }}"#,
        )
        .unwrap();

        assert_eq!(secrets.client_id, "id.apps.googleusercontent.com");
        assert_eq!(secrets.redirect_uris, vec!["http://localhost".to_string()]);
    }

    #[test]
    fn falls_back_to_web_and_default_uris() {
        let secrets =
            ClientSecrets::from_json(r#"{"web": {"client_id": "a", "client_secret": "b"}}"#)
                .unwrap();
        assert_eq!(secrets.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn rejects_file_without_client_section() {
        assert!(ClientSecrets::from_json(r#"{"other": {}}"#).is_err());
    }
}
