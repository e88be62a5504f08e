use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the Ollama server, without the `/api/generate` suffix.
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_temperature: f32,
    /// Forwarded to Ollama as `num_predict`.
    pub ollama_max_tokens: u32,
    pub ollama_timeout_secs: u64,
    /// YAML file holding the users and announcements handed to the chatbot.
    /// When unset the chatbot runs with an empty snapshot.
    pub snapshot_path: Option<PathBuf>,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}
