use serde::{Deserialize, Serialize};

use crate::models::MeetStatus;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_FOLDER: &str = "public/shares";

/// Repository coordinates and token used for authenticated store operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageCredentials {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub folder: String,
    pub token: String,
}

impl Default for StorageCredentials {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            folder: DEFAULT_FOLDER.to_string(),
            token: String::new(),
        }
    }
}

impl StorageCredentials {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Owner, repo and token are all present.
    pub fn is_configured(&self) -> bool {
        !self.owner.trim().is_empty()
            && !self.repo.trim().is_empty()
            && !self.token.trim().is_empty()
    }

    pub fn branch(&self) -> &str {
        let branch = self.branch.trim();
        if branch.is_empty() {
            DEFAULT_BRANCH
        } else {
            branch
        }
    }

    pub fn base_folder(&self) -> &str {
        if self.folder.trim().is_empty() {
            DEFAULT_FOLDER
        } else {
            &self.folder
        }
    }
}

/// Trims whitespace and leading/trailing slashes.
pub fn sanitize_folder(folder: &str) -> String {
    folder.trim().trim_matches('/').to_string()
}

/// Folder holding meets with `status`, e.g. `public/shares/drafts`.
pub fn status_folder(status: MeetStatus, credentials: &StorageCredentials) -> String {
    let base = sanitize_folder(credentials.base_folder());
    if base.is_empty() {
        status.folder().to_string()
    } else {
        sanitize_folder(&format!("{}/{}", base, status.folder()))
    }
}

/// `"<action> <name> (<id>)"`, with `meet` standing in for a blank name.
pub fn commit_message(action: &str, name: &str, id: &str) -> String {
    let name = if name.trim().is_empty() { "meet" } else { name };
    format!("{} {} ({})", action, name, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_folder() {
        assert_eq!(sanitize_folder("  /public/shares//  "), "public/shares");
        assert_eq!(sanitize_folder("///"), "");
        assert_eq!(sanitize_folder(""), "");
        assert_eq!(sanitize_folder("drafts"), "drafts");
    }

    #[test]
    fn test_status_folder() {
        let mut credentials = StorageCredentials::new("coach", "meets", "t");
        assert_eq!(
            status_folder(MeetStatus::Draft, &credentials),
            "public/shares/drafts"
        );
        assert_eq!(
            status_folder(MeetStatus::Published, &credentials),
            "public/shares/published"
        );

        credentials.folder = "/".into();
        assert_eq!(status_folder(MeetStatus::Draft, &credentials), "drafts");

        credentials.folder = "  ".into();
        assert_eq!(
            status_folder(MeetStatus::Draft, &credentials),
            "public/shares/drafts"
        );
    }

    #[test]
    fn test_is_configured() {
        assert!(StorageCredentials::new("coach", "meets", "t").is_configured());
        assert!(!StorageCredentials::new("coach", "meets", " ").is_configured());
        assert!(!StorageCredentials::new("", "meets", "t").is_configured());
        assert!(!StorageCredentials::default().is_configured());
    }

    #[test]
    fn test_branch_default() {
        let mut credentials = StorageCredentials::default();
        credentials.branch = String::new();
        assert_eq!(credentials.branch(), "main");
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(
            commit_message("Save meet", "Winter Classic", "abc"),
            "Save meet Winter Classic (abc)"
        );
        assert_eq!(commit_message("Move meet", "", "abc"), "Move meet meet (abc)");
    }
}
