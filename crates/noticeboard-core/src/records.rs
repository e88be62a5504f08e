//! Portal records handed to the chatbot as context.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Moderator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Moderator => write!(f, "moderator"),
        }
    }
}

/// A portal account. Password hashes never enter the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Announcement {
    /// Title and description joined the way they are fed to sentiment analysis.
    #[must_use]
    pub fn analysis_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.description)
    }
}

/// Point-in-time dump of portal content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
}

impl PortalSnapshot {
    #[must_use]
    pub fn announcement(&self, id: i64) -> Option<&Announcement> {
        self.announcements.iter().find(|a| a.id == id)
    }
}

/// Load and validate a portal snapshot from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_snapshot(path: &Path) -> Result<PortalSnapshot, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SnapshotFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let snapshot: PortalSnapshot = serde_yaml::from_str(&content)?;

    validate_snapshot(&snapshot)?;

    Ok(snapshot)
}

fn validate_snapshot(snapshot: &PortalSnapshot) -> Result<(), ConfigError> {
    let mut user_ids = HashSet::new();
    let mut emails = HashSet::new();

    for user in &snapshot.users {
        if !user_ids.insert(user.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate user id: {}",
                user.id
            )));
        }
        if !emails.insert(user.email.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate user email: '{}'",
                user.email
            )));
        }
    }

    let mut announcement_ids = HashSet::new();
    let mut titles = HashSet::new();

    for announcement in &snapshot.announcements {
        if announcement.title.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "announcement {} has an empty title",
                announcement.id
            )));
        }
        if !announcement_ids.insert(announcement.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate announcement id: {}",
                announcement.id
            )));
        }
        if !titles.insert(announcement.title.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate announcement title: '{}'",
                announcement.title
            )));
        }
        if let Some(user_id) = announcement.user_id {
            if !user_ids.contains(&user_id) {
                return Err(ConfigError::Validation(format!(
                    "announcement {} references unknown user {user_id}",
                    announcement.id
                )));
            }
        }
    }

    Ok(())
}
