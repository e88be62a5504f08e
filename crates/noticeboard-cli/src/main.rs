use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use noticeboard_chatbot::{ChatCompletion, Chatbot, ContextSource, OllamaClient, OllamaConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "noticeboard-cli")]
#[command(about = "Query the noticeboard chatbot from the terminal")]
struct Cli {
    /// Portal snapshot to use as chatbot context (overrides NOTICEBOARD_SNAPSHOT_PATH)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ask the chatbot a question about the portal content
    Ask { query: String },
    /// Classify the sentiment of a text or an announcement
    Sentiment {
        /// Text to analyze
        #[arg(required_unless_present = "announcement", conflicts_with = "announcement")]
        text: Option<String>,

        /// Analyze the announcement with this id from the snapshot instead
        #[arg(long)]
        announcement: Option<i64>,
    },
    /// Summarize a text
    Summarize { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = noticeboard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let snapshot_path = cli.snapshot.or_else(|| config.snapshot_path.clone());

    let client =
        OllamaClient::with_base_url(&config.ollama_url, OllamaConfig::from_app_config(&config))?;
    let context = snapshot_path
        .clone()
        .map_or_else(ContextSource::default, ContextSource::File);
    let chatbot = Chatbot::new(client, context);

    match cli.command {
        Commands::Ask { query } => {
            let reply = chatbot.complete(&query, &[]).await?;
            println!("{reply}");
        }
        Commands::Sentiment { text, announcement } => {
            let text = match (text, announcement) {
                (Some(text), _) => text,
                (None, Some(id)) => announcement_text(snapshot_path.as_deref(), id)?,
                (None, None) => anyhow::bail!("provide TEXT or --announcement"),
            };
            let result = noticeboard_chatbot::analyze_sentiment(&chatbot, &text).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Summarize { text } => {
            let summary = noticeboard_chatbot::summarize(&chatbot, &text).await?;
            println!("{summary}");
        }
    }

    Ok(())
}

fn announcement_text(snapshot_path: Option<&std::path::Path>, id: i64) -> anyhow::Result<String> {
    let path = snapshot_path
        .context("--announcement needs a snapshot (--snapshot or NOTICEBOARD_SNAPSHOT_PATH)")?;
    let snapshot = noticeboard_core::load_snapshot(path)?;
    let announcement = snapshot
        .announcement(id)
        .with_context(|| format!("announcement {id} not found in {}", path.display()))?;
    tracing::debug!(id, title = %announcement.title, "analyzing announcement");
    Ok(announcement.analysis_text())
}
