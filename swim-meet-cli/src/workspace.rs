//! The working meet file the CLI edits between commands.
//!
//! It is a stored meet blob, optionally carrying the catalog entry of the
//! remote record it was saved to or opened from.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swim_meet_core::{MeetMetadata, MeetSession, MeetStatus, StoredMeet};

pub const DEFAULT_MEET_FILE: &str = "meet.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetFile {
    #[serde(flatten)]
    pub meet: StoredMeet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<MeetMetadata>,
}

impl MeetFile {
    pub fn from_session(session: &MeetSession) -> Self {
        let status = session
            .remote()
            .map(|remote| remote.status)
            .unwrap_or(MeetStatus::Draft);
        Self {
            meet: session.to_stored(status),
            remote: session.remote().cloned(),
        }
    }

    pub fn into_session(self) -> MeetSession {
        MeetSession::from_stored(self.meet, self.remote)
    }

    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WorkspaceError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&contents).map_err(|e| WorkspaceError::Parse(path.to_path_buf(), e))
    }

    pub fn save(&self, path: &Path) -> Result<(), WorkspaceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| WorkspaceError::Write(path.to_path_buf(), e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WorkspaceError::Parse(path.to_path_buf(), e))?;
        std::fs::write(path, json).map_err(|e| WorkspaceError::Write(path.to_path_buf(), e))
    }
}

/// Opens the working file as an editing session.
pub fn load_session(path: &Path) -> Result<MeetSession, WorkspaceError> {
    Ok(MeetFile::load(path)?.into_session())
}

/// Opens the working file, or starts an empty session when it does not exist.
pub fn load_or_new_session(path: &Path) -> Result<MeetSession, WorkspaceError> {
    if path.exists() {
        load_session(path)
    } else {
        Ok(MeetSession::new())
    }
}

pub fn save_session(path: &Path, session: &MeetSession) -> Result<(), WorkspaceError> {
    MeetFile::from_session(session).save(path)
}

#[derive(Debug)]
pub enum WorkspaceError {
    Read(PathBuf, std::io::Error),
    Write(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl std::fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceError::Read(path, e) => {
                write!(f, "Failed to read meet file '{}': {}", path.display(), e)
            }
            WorkspaceError::Write(path, e) => {
                write!(f, "Failed to write meet file '{}': {}", path.display(), e)
            }
            WorkspaceError::Parse(path, e) => {
                write!(f, "Meet file '{}' is not valid: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for WorkspaceError {}
