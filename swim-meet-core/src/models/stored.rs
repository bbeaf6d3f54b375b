use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::event::ShareableEvent;
use super::meet::MeetInfo;
use crate::store::sanitize_folder;

/// Schema version written into stored meets and share payloads.
pub const SCHEMA_VERSION: u32 = 1;

/// Lifecycle of a stored meet; decides which folder it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetStatus {
    #[default]
    Draft,
    Published,
}

impl MeetStatus {
    pub fn folder(&self) -> &'static str {
        match self {
            MeetStatus::Draft => "drafts",
            MeetStatus::Published => "published",
        }
    }
}

impl fmt::Display for MeetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetStatus::Draft => write!(f, "draft"),
            MeetStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for MeetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" | "drafts" => Ok(MeetStatus::Draft),
            "published" => Ok(MeetStatus::Published),
            _ => Err(format!(
                "Invalid status '{}'. Valid options: draft, published",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Github,
}

/// Location of a stored meet blob inside a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePointer {
    #[serde(rename = "type", default)]
    pub kind: StorageKind,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub id: String,
}

impl StoragePointer {
    /// Repository path of the blob: `<folder>/<id>.json`.
    pub fn file_path(&self) -> String {
        let folder = sanitize_folder(&self.path);
        if folder.is_empty() {
            format!("{}.json", self.id)
        } else {
            format!("{}/{}.json", folder, self.id)
        }
    }
}

/// The JSON blob persisted for each meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMeet {
    #[serde(default = "default_version")]
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub meet_info: MeetInfo,
    #[serde(default)]
    pub events: Vec<ShareableEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MeetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl StoredMeet {
    pub fn new(meet_info: MeetInfo, events: Vec<ShareableEvent>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            meet_info,
            events,
            status: None,
            updated_at: None,
            share_token: None,
        }
    }
}

/// Catalog entry describing a stored meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetMetadata {
    pub id: String,
    pub meet_name: String,
    pub status: MeetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub events_count: usize,
    pub storage: StoragePointer,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,
}

impl MeetMetadata {
    pub fn from_stored(data: &StoredMeet, storage: StoragePointer, sha: impl Into<String>) -> Self {
        Self {
            id: storage.id.clone(),
            meet_name: data.meet_info.display_name().to_string(),
            status: data.status.unwrap_or_default(),
            created_at: data.generated_at,
            updated_at: data.updated_at.unwrap_or(data.generated_at),
            events_count: data.events.len(),
            storage,
            sha: sha.into(),
            share_token: data.share_token.clone(),
        }
    }
}

impl fmt::Display for MeetMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {} [{}] updated {} - {} events",
            self.id,
            self.meet_name,
            self.status,
            self.updated_at.format("%Y-%m-%d %H:%M"),
            self.events_count
        )
    }
}

/// A share link the coach has published, kept in the local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedLink {
    pub id: String,
    pub meet_name: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub events_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StoragePointer>,
}
