//! Remote meet storage on top of the GitHub Contents API.
//!
//! Each meet is one JSON file at `<folder>/<status folder>/<id>.json`.
//! Writes use the file's blob sha for optimistic concurrency: updates must
//! present the current sha, creates must not.

mod error;
mod github;
mod paths;

pub use error::StoreError;
pub use github::{FetchedMeet, GitHubStore, ListedMeet, SaveResult, GITHUB_API_BASE};
pub use paths::{
    commit_message, sanitize_folder, status_folder, StorageCredentials, DEFAULT_BRANCH,
    DEFAULT_FOLDER,
};
