mod api;
mod middleware;

use std::sync::Arc;

use noticeboard_chatbot::{Chatbot, ContextSource, OllamaClient, OllamaConfig};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = noticeboard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let context = match &config.snapshot_path {
        Some(path) => {
            // Fail fast on a broken snapshot; it is re-read per query afterwards.
            let snapshot = noticeboard_core::load_snapshot(path)?;
            tracing::info!(
                path = %path.display(),
                users = snapshot.users.len(),
                announcements = snapshot.announcements.len(),
                "portal snapshot loaded"
            );
            ContextSource::File(path.clone())
        }
        None => {
            tracing::warn!(
                "NOTICEBOARD_SNAPSHOT_PATH not set; chatbot runs without portal context"
            );
            ContextSource::default()
        }
    };

    let client =
        OllamaClient::with_base_url(&config.ollama_url, OllamaConfig::from_app_config(&config))?;
    tracing::info!(
        url = %client.generate_url(),
        model = client.model(),
        "ollama client configured"
    );

    let auth = AuthState::from_env(matches!(
        config.env,
        noticeboard_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            chatbot: Arc::new(Chatbot::new(client, context)),
        },
        auth,
        rate_limit_state(config.rate_limit_max_requests, config.rate_limit_window_secs),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "noticeboard server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
