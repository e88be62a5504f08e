use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("NOTICEBOARD_ENV", "development"));

    let bind_addr = parse("NOTICEBOARD_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NOTICEBOARD_LOG_LEVEL", "info");

    let ollama_url = or_default("NOTICEBOARD_OLLAMA_URL", "http://localhost:11434");
    let ollama_model = or_default("NOTICEBOARD_OLLAMA_MODEL", "llama3.1:latest");
    let ollama_temperature: f32 = parse_num(
        "NOTICEBOARD_OLLAMA_TEMPERATURE",
        &or_default("NOTICEBOARD_OLLAMA_TEMPERATURE", "0.7"),
    )?;
    if !(0.0..=2.0).contains(&ollama_temperature) {
        return Err(ConfigError::InvalidEnvVar {
            var: "NOTICEBOARD_OLLAMA_TEMPERATURE".to_string(),
            reason: format!("{ollama_temperature} is outside 0.0..=2.0"),
        });
    }
    let ollama_max_tokens = parse_num(
        "NOTICEBOARD_OLLAMA_MAX_TOKENS",
        &or_default("NOTICEBOARD_OLLAMA_MAX_TOKENS", "2000"),
    )?;
    let ollama_timeout_secs = parse_num(
        "NOTICEBOARD_OLLAMA_TIMEOUT_SECS",
        &or_default("NOTICEBOARD_OLLAMA_TIMEOUT_SECS", "120"),
    )?;

    let snapshot_path = lookup("NOTICEBOARD_SNAPSHOT_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let rate_limit_max_requests: usize = parse_num(
        "NOTICEBOARD_RATE_LIMIT_MAX_REQUESTS",
        &or_default("NOTICEBOARD_RATE_LIMIT_MAX_REQUESTS", "120"),
    )?;
    require_positive("NOTICEBOARD_RATE_LIMIT_MAX_REQUESTS", rate_limit_max_requests)?;
    let rate_limit_window_secs: u64 = parse_num(
        "NOTICEBOARD_RATE_LIMIT_WINDOW_SECS",
        &or_default("NOTICEBOARD_RATE_LIMIT_WINDOW_SECS", "60"),
    )?;
    require_positive("NOTICEBOARD_RATE_LIMIT_WINDOW_SECS", rate_limit_window_secs)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        ollama_url,
        ollama_model,
        ollama_temperature,
        ollama_max_tokens,
        ollama_timeout_secs,
        snapshot_path,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

fn parse_num<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// A zero rate-limit setting would reject every protected request.
fn require_positive<T>(var: &str, value: T) -> Result<(), ConfigError>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
