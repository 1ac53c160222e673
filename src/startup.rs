use crate::agent::Assistant;
use crate::components::google_calendar::{GoogleCalendar, TokenManager};
use crate::components::knowledge::{default_embedder, KnowledgeRetriever};
use crate::config::Config;
use crate::error::{AssistantResult, Error};
use crate::shutdown::ShutdownSignal;
use rust_i18n::t;
use std::io::BufRead;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const SEPARATOR_WIDTH: usize = 50;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,reqwest=warn,hyper=warn,hyper_util=warn")
            }),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            debug!("Effective configuration:\n{}", config.to_toml_string()?);
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Index the knowledge base and wire the calendar client
///
/// Indexing failures are fatal. The calendar session is only established on
/// the first calendar request.
pub async fn build_assistant(config: Arc<Config>) -> AssistantResult<Assistant> {
    let embedder = default_embedder(&config)?;
    let retriever = KnowledgeRetriever::from_config(&config, embedder).await?;

    let client = reqwest::Client::new();
    let session = Arc::new(TokenManager::new(Arc::clone(&config), client.clone()));
    let calendar = GoogleCalendar::new(&config, client, session)?;

    Ok(Assistant::new(
        config,
        Arc::new(retriever),
        Arc::new(calendar),
    ))
}

/// Run the interactive loop on stdin/stdout until exit, EOF or a signal
pub async fn run(assistant: Assistant) -> miette::Result<()> {
    let mut signal = ShutdownSignal::register()?;
    let input = spawn_stdin_reader();
    let output = tokio::io::stdout();

    tokio::select! {
        result = run_session(&assistant, input, output) => {
            result?;
        }
        _ = signal.recv() => {
            info!("Received shutdown signal, leaving the session");
            println!();
            println!("{}", t!("goodbye"));
        }
    }

    Ok(())
}

/// Forward stdin lines from a dedicated thread
///
/// The thread is never joined, so a read blocked on an open terminal does
/// not hold up shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(1);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }
    });

    receiver
}

/// One interactive session over a stream of input lines
///
/// The session ends on an exit command or when the sender side closes. A
/// failed query is reported and the session continues.
pub async fn run_session<W>(
    assistant: &Assistant,
    mut input: mpsc::Receiver<String>,
    mut output: W,
) -> AssistantResult<()>
where
    W: AsyncWrite + Unpin,
{
    let banner = format!("{}\n{}\n\n", t!("banner_title"), t!("banner_hint"));
    output.write_all(banner.as_bytes()).await?;

    loop {
        output.write_all(t!("prompt").as_bytes()).await?;
        output.flush().await?;

        let Some(line) = input.recv().await else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit_command(query) {
            break;
        }

        let report = match assistant.decide_and_act(query).await {
            Ok(result) => format!(
                "\n{}\n{}\n{}\n",
                t!("result_header"),
                serde_json::to_string_pretty(&result)?,
                "-".repeat(SEPARATOR_WIDTH)
            ),
            Err(e) => {
                error!("Query failed: {:?}", e);
                format!("{}\n", t!("query_failed", error = e.to_string()))
            }
        };
        output.write_all(report.as_bytes()).await?;
    }

    output
        .write_all(format!("{}\n", t!("goodbye")).as_bytes())
        .await?;
    output.flush().await?;

    Ok(())
}

fn is_exit_command(query: &str) -> bool {
    query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands_ignore_case() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("Exit"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("list events"));
    }
}
