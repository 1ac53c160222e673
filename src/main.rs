use calendar_assistant::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calendar assistant");

    // Load configuration
    let config = startup::load_config()?;

    // Index the knowledge base and connect the calendar
    let assistant = startup::build_assistant(config).await?;

    // Start the interactive session
    startup::run(assistant).await
}
