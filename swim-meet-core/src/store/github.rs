use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::StoreError;
use super::paths::{commit_message, sanitize_folder, status_folder, StorageCredentials};
use crate::models::{MeetMetadata, MeetStatus, StorageKind, StoragePointer, StoredMeet};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = "swim-meet";

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct SaveResult {
    pub pointer: StoragePointer,
    pub sha: String,
    /// The blob as written, with `status` and `updatedAt` stamped.
    pub data: StoredMeet,
}

impl SaveResult {
    pub fn metadata(&self) -> MeetMetadata {
        MeetMetadata::from_stored(&self.data, self.pointer.clone(), self.sha.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FetchedMeet {
    pub data: StoredMeet,
    pub sha: String,
}

#[derive(Debug, Clone)]
pub struct ListedMeet {
    pub metadata: MeetMetadata,
    pub data: StoredMeet,
}

#[derive(Deserialize)]
struct FileContents {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Deserialize)]
struct DirectoryEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Client for meets stored as JSON files in a GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: reqwest::Client,
    api_base: String,
}

impl Default for GitHubStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubStore {
    pub fn new() -> Self {
        Self::with_api_base(GITHUB_API_BASE)
    }

    /// Creates a store talking to a different API root (GitHub Enterprise, tests).
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!("{}/repos/{}/{}/contents/{}", self.api_base, owner, repo, path)
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT);

        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => builder.header("Authorization", format!("token {}", token)),
            None => builder,
        }
    }

    /// Writes `data` into the folder for `status`.
    ///
    /// With `existing`, the meet keeps its id. If `existing` lives in another
    /// status folder it is deleted first and the new file is created without
    /// a sha; otherwise its sha is sent so GitHub updates it in place.
    pub async fn save(
        &self,
        credentials: &StorageCredentials,
        mut data: StoredMeet,
        status: MeetStatus,
        existing: Option<&MeetMetadata>,
    ) -> Result<SaveResult, StoreError> {
        if !credentials.is_configured() {
            return Err(StoreError::NotConfigured);
        }

        let branch = credentials.branch().to_string();
        let folder = status_folder(status, credentials);
        let id = existing
            .map(|meta| meta.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut prior_sha = existing.map(|meta| meta.sha.clone());
        if let Some(existing) = existing {
            if sanitize_folder(&existing.storage.path) != folder {
                debug!(
                    id = %existing.id,
                    from = %existing.storage.path,
                    to = %folder,
                    "moving meet between folders"
                );
                self.delete(
                    &existing.storage,
                    &existing.sha,
                    credentials,
                    Some(&commit_message("Move meet", &existing.meet_name, &existing.id)),
                )
                .await?;
                prior_sha = None;
            }
        }

        data.status = Some(status);
        data.updated_at = Some(Utc::now());

        let pointer = StoragePointer {
            kind: StorageKind::Github,
            owner: credentials.owner.clone(),
            repo: credentials.repo.clone(),
            branch: branch.clone(),
            path: folder,
            id: id.clone(),
        };

        let json_text =
            serde_json::to_string(&data).map_err(|e| StoreError::Decode(e.to_string()))?;
        let name = match data.meet_info.meet_name.trim() {
            "" => "Untitled",
            name => name,
        };
        let mut body = json!({
            "message": commit_message("Save meet", name, &id),
            "content": STANDARD.encode(json_text.as_bytes()),
            "branch": branch,
        });
        if let Some(sha) = prior_sha.filter(|sha| !sha.is_empty()) {
            body["sha"] = Value::String(sha);
        }

        let url = self.contents_url(&pointer.owner, &pointer.repo, &pointer.file_path());
        debug!(url = %url, "uploading meet");
        let response = self
            .request(Method::PUT, &url, Some(&credentials.token))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let response_body: Value = response.json().await.unwrap_or(Value::Null);
        let sha = response_body["content"]["sha"]
            .as_str()
            .filter(|sha| !sha.is_empty())
            .ok_or(StoreError::MissingSha)?
            .to_string();

        info!(id = %id, status = %status, "saved meet");
        Ok(SaveResult { pointer, sha, data })
    }

    /// Reads the meet `pointer` refers to with the caller's credentials.
    pub async fn fetch(
        &self,
        pointer: &StoragePointer,
        credentials: &StorageCredentials,
    ) -> Result<FetchedMeet, StoreError> {
        if !credentials.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        self.fetch_with_token(pointer, Some(&credentials.token)).await
    }

    /// Reads a meet without credentials. Works for public repositories, which
    /// is how recipients of a share link resolve remote payloads.
    pub async fn fetch_public(&self, pointer: &StoragePointer) -> Result<FetchedMeet, StoreError> {
        self.fetch_with_token(pointer, None).await
    }

    async fn fetch_with_token(
        &self,
        pointer: &StoragePointer,
        token: Option<&str>,
    ) -> Result<FetchedMeet, StoreError> {
        let file_path = pointer.file_path();
        let url = format!(
            "{}?ref={}",
            self.contents_url(&pointer.owner, &pointer.repo, &file_path),
            urlencoding::encode(&pointer.branch)
        );
        debug!(url = %url, "fetching meet");

        let response = self.request(Method::GET, &url, token).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(file_path));
        }
        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let file: FileContents = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let content: String = file
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !matches!(c, '\n' | '\r'))
            .collect();
        let bytes = STANDARD
            .decode(content.as_bytes())
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let data: StoredMeet =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(FetchedMeet {
            data,
            sha: file.sha.unwrap_or_else(|| pointer.id.clone()),
        })
    }

    /// Lists meets with `status`.
    ///
    /// Unconfigured storage and a missing folder both yield an empty list.
    /// Files that fail to load are logged and skipped.
    pub async fn list(
        &self,
        credentials: &StorageCredentials,
        status: MeetStatus,
    ) -> Result<Vec<ListedMeet>, StoreError> {
        if !credentials.is_configured() {
            debug!("storage not configured, nothing to list");
            return Ok(Vec::new());
        }

        let branch = credentials.branch().to_string();
        let folder = status_folder(status, credentials);
        let url = format!(
            "{}?ref={}",
            self.contents_url(&credentials.owner, &credentials.repo, &folder),
            urlencoding::encode(&branch)
        );
        debug!(url = %url, "listing meets");

        let response = self
            .request(Method::GET, &url, Some(&credentials.token))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let entries: Vec<DirectoryEntry> = match response.json::<Value>().await {
            Ok(value @ Value::Array(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => return Ok(Vec::new()),
        };

        let mut results = Vec::new();
        for entry in entries {
            let (Some(name), Some("file")) = (entry.name.as_deref(), entry.kind.as_deref()) else {
                continue;
            };
            let Some(id) = name.strip_suffix(".json") else {
                continue;
            };

            let pointer = StoragePointer {
                kind: StorageKind::Github,
                owner: credentials.owner.clone(),
                repo: credentials.repo.clone(),
                branch: branch.clone(),
                path: folder.clone(),
                id: id.to_string(),
            };

            match self.fetch(&pointer, credentials).await {
                Ok(FetchedMeet { mut data, sha }) => {
                    data.status.get_or_insert(status);
                    let metadata = MeetMetadata::from_stored(&data, pointer, sha);
                    results.push(ListedMeet { metadata, data });
                }
                Err(e) => warn!(id = %id, error = %e, "failed to load meet"),
            }
        }

        Ok(results)
    }

    /// Deletes the file `pointer` refers to. `sha` must be its current blob sha.
    pub async fn delete(
        &self,
        pointer: &StoragePointer,
        sha: &str,
        credentials: &StorageCredentials,
        message: Option<&str>,
    ) -> Result<(), StoreError> {
        if !credentials.is_configured() {
            return Err(StoreError::NotConfigured);
        }

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| commit_message("Delete meet", &pointer.id, &pointer.id));
        let url = self.contents_url(&pointer.owner, &pointer.repo, &pointer.file_path());
        debug!(url = %url, "deleting meet");

        let response = self
            .request(Method::DELETE, &url, Some(&credentials.token))
            .json(&json!({
                "message": message,
                "sha": sha,
                "branch": pointer.branch,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        info!(id = %pointer.id, "deleted meet");
        Ok(())
    }
}

/// Builds an error from a non-success response, preferring GitHub's `message`.
async fn http_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| body["message"].as_str().map(str::to_string))
        .unwrap_or(text);
    StoreError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, MeetInfo, ShareableEvent};
    use wiremock::matchers::{body_partial_json, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> StorageCredentials {
        StorageCredentials::new("coach", "meets", "secret")
    }

    fn stored(name: &str) -> StoredMeet {
        StoredMeet::new(
            MeetInfo::new(name),
            vec![ShareableEvent {
                event_number: "1".into(),
                gender: Gender::Girls,
                distance: 50,
                ..ShareableEvent::default()
            }],
        )
    }

    fn contents_body(data: &StoredMeet, sha: Option<&str>) -> Value {
        let encoded = STANDARD.encode(serde_json::to_string(data).unwrap());
        // GitHub wraps base64 content at 60 columns.
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        match sha {
            Some(sha) => json!({ "content": wrapped, "sha": sha }),
            None => json!({ "content": wrapped }),
        }
    }

    fn existing_draft(id: &str, sha: &str) -> MeetMetadata {
        let pointer = StoragePointer {
            kind: StorageKind::Github,
            owner: "coach".into(),
            repo: "meets".into(),
            branch: "main".into(),
            path: "public/shares/drafts".into(),
            id: id.into(),
        };
        MeetMetadata::from_stored(&stored("Winter Classic"), pointer, sha)
    }

    #[tokio::test]
    async fn test_save_new_meet_creates_without_sha() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/repos/coach/meets/contents/public/shares/drafts/[0-9a-f-]+\.json$"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "content": { "sha": "abc123" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let result = store
            .save(&credentials(), stored("Winter Classic"), MeetStatus::Draft, None)
            .await
            .unwrap();

        assert_eq!(result.sha, "abc123");
        assert_eq!(result.pointer.path, "public/shares/drafts");
        assert_eq!(result.pointer.branch, "main");
        assert_eq!(result.data.status, Some(MeetStatus::Draft));
        assert!(result.data.updated_at.is_some());

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("sha").is_none());
        assert_eq!(body["branch"], "main");
        assert_eq!(
            body["message"],
            format!("Save meet Winter Classic ({})", result.pointer.id)
        );
        assert_eq!(
            requests[0].headers.get("authorization").unwrap(),
            "token secret"
        );

        let content = STANDARD.decode(body["content"].as_str().unwrap()).unwrap();
        let written: StoredMeet = serde_json::from_slice(&content).unwrap();
        assert_eq!(written.status, Some(MeetStatus::Draft));
    }

    #[tokio::test]
    async fn test_save_same_folder_sends_prior_sha() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/coach/meets/contents/public/shares/drafts/m1.json"))
            .and(body_partial_json(json!({ "sha": "old" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "content": { "sha": "new" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let existing = existing_draft("m1", "old");
        let result = store
            .save(&credentials(), stored("Winter Classic"), MeetStatus::Draft, Some(&existing))
            .await
            .unwrap();

        assert_eq!(result.pointer.id, "m1");
        assert_eq!(result.sha, "new");
    }

    #[tokio::test]
    async fn test_publish_moves_draft_then_creates_fresh() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/coach/meets/contents/public/shares/drafts/m1.json"))
            .and(body_partial_json(json!({
                "sha": "old",
                "branch": "main",
                "message": "Move meet Winter Classic (m1)",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/coach/meets/contents/public/shares/published/m1.json"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "content": { "sha": "new" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let existing = existing_draft("m1", "old");
        let result = store
            .save(
                &credentials(),
                stored("Winter Classic"),
                MeetStatus::Published,
                Some(&existing),
            )
            .await
            .unwrap();

        assert_eq!(result.pointer.path, "public/shares/published");
        assert_eq!(result.data.status, Some(MeetStatus::Published));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method.as_str(), "DELETE");
        assert_eq!(requests[1].method.as_str(), "PUT");
        let put_body: Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert!(put_body.get("sha").is_none());
    }

    #[tokio::test]
    async fn test_save_without_sha_in_response_fails() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "content": {} })))
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let err = store
            .save(&credentials(), stored("Open"), MeetStatus::Draft, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingSha));
    }

    #[tokio::test]
    async fn test_save_http_failure_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "sha mismatch" })),
            )
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let err = store
            .save(&credentials(), stored("Open"), MeetStatus::Draft, None)
            .await
            .unwrap_err();
        match err {
            StoreError::Http { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "sha mismatch");
            }
            other => panic!("expected http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_incomplete_credentials_fail_without_request() {
        let server = MockServer::start().await;
        let store = GitHubStore::with_api_base(server.uri());
        let credentials = StorageCredentials::new("coach", "meets", "");
        let pointer = existing_draft("m1", "sha").storage;

        let err = store
            .save(&credentials, stored("Open"), MeetStatus::Draft, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured));
        assert!(matches!(
            store.fetch(&pointer, &credentials).await,
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(
            store.delete(&pointer, "sha", &credentials, None).await,
            Err(StoreError::NotConfigured)
        ));
        assert!(store
            .list(&credentials, MeetStatus::Draft)
            .await
            .unwrap()
            .is_empty());

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_decodes_wrapped_content() {
        let server = MockServer::start().await;
        let data = stored("Winter Classic");
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/drafts/m1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(contents_body(&data, Some("s1"))))
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let pointer = existing_draft("m1", "s1").storage;
        let fetched = store.fetch(&pointer, &credentials()).await.unwrap();

        assert_eq!(fetched.data, data);
        assert_eq!(fetched.sha, "s1");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("ref=main"));
    }

    #[tokio::test]
    async fn test_fetch_public_sends_no_token_and_falls_back_to_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_body(&stored("Open"), None)),
            )
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let pointer = existing_draft("m1", "s1").storage;
        let fetched = store.fetch_public(&pointer).await.unwrap();

        assert_eq!(fetched.sha, "m1");
        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let err = store
            .fetch_public(&existing_draft("gone", "s").storage)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_fetch_malformed_content_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "content": STANDARD.encode("not json"), "sha": "s" })),
            )
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let err = store
            .fetch_public(&existing_draft("m1", "s").storage)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_list_missing_folder_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/published"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let meets = store
            .list(&credentials(), MeetStatus::Published)
            .await
            .unwrap();
        assert!(meets.is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_failures_and_non_json_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/drafts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "good.json", "type": "file" },
                { "name": "broken.json", "type": "file" },
                { "name": "README.md", "type": "file" },
                { "name": "archive", "type": "dir" },
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/drafts/good.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_body(&stored(""), Some("g1"))),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/drafts/broken.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let meets = store.list(&credentials(), MeetStatus::Draft).await.unwrap();

        assert_eq!(meets.len(), 1);
        let metadata = &meets[0].metadata;
        assert_eq!(metadata.id, "good");
        assert_eq!(metadata.sha, "g1");
        assert_eq!(metadata.meet_name, "Untitled Meet");
        assert_eq!(metadata.status, MeetStatus::Draft);
        assert_eq!(metadata.events_count, 1);
        assert_eq!(meets[0].data.status, Some(MeetStatus::Draft));

        // Three GETs: the listing plus one per .json entry.
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_status_falls_back_to_folder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/published"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "name": "p1.json", "type": "file" }])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/coach/meets/contents/public/shares/published/p1.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_body(&stored("Open"), Some("p"))),
            )
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let meets = store
            .list(&credentials(), MeetStatus::Published)
            .await
            .unwrap();
        assert_eq!(meets[0].metadata.status, MeetStatus::Published);
    }

    #[tokio::test]
    async fn test_delete_failure_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let pointer = existing_draft("m1", "s").storage;
        let err = store
            .delete(&pointer, "s", &credentials(), None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn test_delete_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(body_partial_json(json!({ "message": "Delete meet m1 (m1)", "sha": "s" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let store = GitHubStore::with_api_base(server.uri());
        let pointer = existing_draft("m1", "s").storage;
        store
            .delete(&pointer, "s", &credentials(), None)
            .await
            .unwrap();
    }
}
