use calendar_assistant::components::google_calendar::TokenManager;
use calendar_assistant::config::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = Arc::new(Config::load()?);
    let token_manager = TokenManager::new(Arc::clone(&config), reqwest::Client::new());

    let token = token_manager.authorize().await?;

    println!("Authorization successful!");
    println!("Token saved to {}", config.token_path.display());
    if token.refresh_token.is_none() {
        println!("Warning: no refresh token was returned, the token cannot be renewed automatically");
    }

    Ok(())
}
