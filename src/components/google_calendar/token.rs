use super::credentials::ClientSecrets;
use crate::config::Config;
use crate::error::{auth_error, other_error, AssistantResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Scope needed to read and create events
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Tokens this close to expiry are treated as expired
const EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth token as cached in the token file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
}

impl Token {
    fn from_response(response: TokenResponse, previous_refresh: Option<String>, now: i64) -> Self {
        Self {
            access_token: response.access_token,
            // Google omits the refresh token on refresh; keep the one we had
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now + response.expires_in.unwrap_or(3600),
            token_type: response.token_type,
            scope: response.scope,
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at - EXPIRY_SKEW_SECS <= now
    }

    /// Read a cached token; a missing file means no token yet
    pub fn load(path: &Path) -> AssistantResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, path: &Path) -> AssistantResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Where a session stands before a request is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    CachedValid,
    CachedExpired { refreshable: bool },
}

impl SessionState {
    pub fn of(token: Option<&Token>, now: i64) -> Self {
        match token {
            None => SessionState::Unauthenticated,
            Some(t) if !t.is_expired_at(now) => SessionState::CachedValid,
            Some(t) => SessionState::CachedExpired {
                refreshable: t.refresh_token.is_some(),
            },
        }
    }
}

/// Supplies bearer tokens to the calendar client
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn access_token(&self) -> AssistantResult<String>;
}

/// File-backed session: reuses, refreshes or (first run) obtains a token
pub struct TokenManager {
    config: Arc<Config>,
    client: Client,
    token: RwLock<Option<Token>>,
}

impl TokenManager {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        let token = match Token::load(&config.token_path) {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    "Ignoring unreadable token file {}: {}",
                    config.token_path.display(),
                    e
                );
                None
            }
        };

        Self {
            config,
            client,
            token: RwLock::new(token),
        }
    }

    /// Current state of the cached session
    pub async fn state(&self) -> SessionState {
        SessionState::of(self.token.read().await.as_ref(), Utc::now().timestamp())
    }

    /// Run the consent flow unconditionally and cache the new token
    pub async fn authorize(&self) -> AssistantResult<Token> {
        let token = self.first_consent().await?;
        self.store(token.clone()).await?;
        Ok(token)
    }

    async fn store(&self, token: Token) -> AssistantResult<()> {
        token.save(&self.config.token_path)?;
        debug!("Token saved to {}", self.config.token_path.display());
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn first_consent(&self) -> AssistantResult<Token> {
        let secrets = ClientSecrets::from_file(&self.config.credentials_path)?;
        ConsentFlow::new(&secrets, self.config.oauth_redirect_port)
            .run(&self.client)
            .await
    }

    /// Exchange the refresh token for a new access token
    async fn refresh(&self, token: &Token) -> AssistantResult<Token> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;
        let secrets = ClientSecrets::from_file(&self.config.credentials_path)?;

        let params = [
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&secrets.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        read_token_response(response, Some(refresh_token.to_string())).await
    }
}

#[async_trait]
impl SessionProvider for TokenManager {
    async fn access_token(&self) -> AssistantResult<String> {
        let now = Utc::now().timestamp();
        let current = self.token.read().await.clone();
        let token = match (SessionState::of(current.as_ref(), now), current) {
            (SessionState::CachedValid, Some(token)) => return Ok(token.access_token),
            (SessionState::CachedExpired { refreshable: true }, Some(token)) => {
                info!("Cached token expired, refreshing");
                self.refresh(&token).await?
            }
            (state, _) => {
                info!(?state, "No usable token, starting consent flow");
                self.first_consent().await?
            }
        };

        let access_token = token.access_token.clone();
        self.store(token).await?;
        Ok(access_token)
    }
}

/// Turn a token endpoint reply into a `Token`
async fn read_token_response(
    response: reqwest::Response,
    previous_refresh: Option<String>,
) -> AssistantResult<Token> {
    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(auth_error(&format!(
            "Token request failed: HTTP {} - {}",
            status, error_body
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

    Ok(Token::from_response(body, previous_refresh, Utc::now().timestamp()))
}

/// Interactive first-consent flow with a loopback redirect
pub struct ConsentFlow<'a> {
    secrets: &'a ClientSecrets,
    port: u16,
    state: String,
}

impl<'a> ConsentFlow<'a> {
    pub fn new(secrets: &'a ClientSecrets, port: u16) -> Self {
        Self {
            secrets,
            port,
            state: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    pub fn authorization_url(&self) -> AssistantResult<Url> {
        let mut url = Url::parse(&self.secrets.auth_uri)
            .map_err(|e| auth_error(&format!("Invalid auth_uri: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.secrets.client_id)
            .append_pair("redirect_uri", &self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("scope", CALENDAR_SCOPE)
            .append_pair("state", &self.state);

        Ok(url)
    }

    /// Send the user to the consent page and wait for the redirect
    ///
    /// The listener is bound before the browser opens.
    pub async fn run(&self, client: &Client) -> AssistantResult<Token> {
        let auth_url = self.authorization_url()?;

        let server = tiny_http::Server::http(("127.0.0.1", self.port))
            .map_err(|e| auth_error(&format!("Failed to listen on port {}: {}", self.port, e)))?;

        println!("\nAUTHORIZE THIS APP");
        println!("{}\n", auth_url);
        if let Err(e) = webbrowser::open(auth_url.as_str()) {
            warn!("Could not open a browser, open the link manually: {}", e);
        }
        info!("Waiting for authorization callback on {}", self.redirect_uri());

        let (server, request) = tokio::task::spawn_blocking(move || {
            let request = wait_for_callback(&server)?;
            Ok::<_, std::io::Error>((server, request))
        })
        .await
        .map_err(|e| other_error(&format!("Callback listener failed: {}", e)))??;

        let callback = parse_callback(request.url(), &self.state);
        let reply = match &callback {
            Ok(_) => "Authorization successful! You can close this window.",
            Err(_) => "Authorization failed. See the terminal for details.",
        };
        request.respond(tiny_http::Response::from_string(reply))?;
        drop(server);

        self.exchange_code(client, &callback?).await
    }

    async fn exchange_code(&self, client: &Client, code: &str) -> AssistantResult<Token> {
        let redirect_uri = self.redirect_uri();
        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = client
            .post(&self.secrets.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to exchange authorization code: {}", e)))?;

        read_token_response(response, None).await
    }
}

/// Pull the authorization code out of the redirect path
/// Block until the redirect carrying `code` or `error` arrives
///
/// Anything else the browser asks for (such as `/favicon.ico`) gets a 404.
pub(crate) fn wait_for_callback(server: &tiny_http::Server) -> std::io::Result<tiny_http::Request> {
    loop {
        let request = server.recv()?;
        if is_callback(request.url()) {
            return Ok(request);
        }

        debug!("Ignoring request for {} while waiting for consent", request.url());
        let not_found = tiny_http::Response::empty(tiny_http::StatusCode(404));
        if let Err(e) = request.respond(not_found) {
            debug!("Failed to answer stray request: {}", e);
        }
    }
}

fn is_callback(path: &str) -> bool {
    Url::parse("http://localhost")
        .and_then(|base| base.join(path))
        .map(|url| {
            url.query_pairs()
                .any(|(key, _)| key == "code" || key == "error")
        })
        .unwrap_or(false)
}

pub(crate) fn parse_callback(path: &str, expected_state: &str) -> AssistantResult<String> {
    let url = Url::parse("http://localhost")
        .and_then(|base| base.join(path))
        .map_err(|e| auth_error(&format!("Malformed callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(auth_error(&format!("Consent was not granted: {}", error)));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(auth_error("State mismatch in authorization callback"));
    }
    code.ok_or_else(|| auth_error("No authorization code found in callback"))
}
