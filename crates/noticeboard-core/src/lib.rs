//! Shared configuration and portal record types for the noticeboard services.

mod app_config;
mod config;
mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{load_snapshot, Announcement, PortalSnapshot, Role, User};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read snapshot file {path}: {source}")]
    SnapshotFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot file: {0}")]
    SnapshotFileParse(#[from] serde_yaml::Error),

    #[error("snapshot validation failed: {0}")]
    Validation(String),
}
