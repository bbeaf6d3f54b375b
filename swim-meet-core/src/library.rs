//! The coach's meet catalog: remote store plus a local cache of the last
//! fetched copy of every meet.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::ErrorKind;
use crate::models::{
    from_shareable_events, Event, MeetInfo, MeetMetadata, MeetStatus, PublishedLink,
    StorageKind, StoragePointer, StoredMeet,
};
use crate::session::{MeetSession, SessionError};
use crate::share::{build_share_url, decode_share_payload, encode_share_payload, ShareError, SharePayload};
use crate::store::{
    commit_message, status_folder, GitHubStore, ListedMeet, StorageCredentials, StoreError,
};

#[derive(Debug)]
pub enum LibraryError {
    Store(StoreError),
    Share(ShareError),
    Session(SessionError),
    /// No meet with this id in the cache or either status folder.
    MeetNotFound(String),
    /// A share payload with neither inline data nor a storage pointer.
    EmptyPayload,
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Store(e) => write!(f, "{}", e),
            LibraryError::Share(e) => write!(f, "{}", e),
            LibraryError::Session(e) => write!(f, "{}", e),
            LibraryError::MeetNotFound(id) => write!(f, "Meet not found: {}", id),
            LibraryError::EmptyPayload => {
                write!(f, "Shared link contains no meet data and no storage reference")
            }
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<StoreError> for LibraryError {
    fn from(e: StoreError) -> Self {
        LibraryError::Store(e)
    }
}

impl From<ShareError> for LibraryError {
    fn from(e: ShareError) -> Self {
        LibraryError::Share(e)
    }
}

impl From<SessionError> for LibraryError {
    fn from(e: SessionError) -> Self {
        LibraryError::Session(e)
    }
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::Store(e) => e.kind(),
            LibraryError::Share(e) => e.kind(),
            LibraryError::Session(e) => e.kind(),
            LibraryError::MeetNotFound(_) => ErrorKind::NotFound,
            LibraryError::EmptyPayload => ErrorKind::Decode,
        }
    }
}

/// Result of publishing a meet.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub metadata: MeetMetadata,
    pub token: String,
    pub url: String,
    pub link: PublishedLink,
}

/// A meet recovered from a share link.
#[derive(Debug, Clone)]
pub struct SharedMeet {
    pub meet_info: MeetInfo,
    pub events: Vec<Event>,
    pub generated_at: DateTime<Utc>,
    /// Where the data came from when the link referenced a stored meet.
    pub storage: Option<StoragePointer>,
}

pub struct MeetLibrary {
    store: GitHubStore,
    credentials: StorageCredentials,
    cache: HashMap<String, ListedMeet>,
}

impl MeetLibrary {
    pub fn new(store: GitHubStore, credentials: StorageCredentials) -> Self {
        Self {
            store,
            credentials,
            cache: HashMap::new(),
        }
    }

    pub fn credentials(&self) -> &StorageCredentials {
        &self.credentials
    }

    pub fn store(&self) -> &GitHubStore {
        &self.store
    }

    pub fn cached(&self, id: &str) -> Option<&ListedMeet> {
        self.cache.get(id)
    }

    /// Cached catalog entries with `status`, most recently updated first.
    pub fn cached_metadata(&self, status: MeetStatus) -> Vec<MeetMetadata> {
        let mut entries: Vec<MeetMetadata> = self
            .cache
            .values()
            .filter(|meet| meet.metadata.status == status)
            .map(|meet| meet.metadata.clone())
            .collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        entries
    }

    /// Re-lists the `status` folder and replaces that part of the cache.
    pub async fn refresh(&mut self, status: MeetStatus) -> Result<Vec<MeetMetadata>, LibraryError> {
        let listed = self.store.list(&self.credentials, status).await?;
        self.cache.retain(|_, meet| meet.metadata.status != status);
        for meet in listed {
            self.cache.insert(meet.metadata.id.clone(), meet);
        }
        debug!(status = %status, count = self.cache.len(), "refreshed meet cache");
        Ok(self.cached_metadata(status))
    }

    /// Catalog entry for `id`, looking in the cache first and then in each
    /// status folder.
    pub async fn find(&mut self, id: &str) -> Result<MeetMetadata, LibraryError> {
        if let Some(meet) = self.cache.get(id) {
            return Ok(meet.metadata.clone());
        }

        for status in [MeetStatus::Draft, MeetStatus::Published] {
            let pointer = StoragePointer {
                kind: StorageKind::Github,
                owner: self.credentials.owner.clone(),
                repo: self.credentials.repo.clone(),
                branch: self.credentials.branch().to_string(),
                path: status_folder(status, &self.credentials),
                id: id.to_string(),
            };
            match self.store.fetch(&pointer, &self.credentials).await {
                Ok(fetched) => {
                    let mut data = fetched.data;
                    data.status.get_or_insert(status);
                    let metadata = MeetMetadata::from_stored(&data, pointer, fetched.sha);
                    self.cache.insert(
                        id.to_string(),
                        ListedMeet {
                            metadata: metadata.clone(),
                            data,
                        },
                    );
                    return Ok(metadata);
                }
                Err(StoreError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(LibraryError::MeetNotFound(id.to_string()))
    }

    /// Opens a meet for editing.
    pub async fn open(&mut self, id: &str) -> Result<MeetSession, LibraryError> {
        self.find(id).await?;
        let meet = self
            .cache
            .get(id)
            .ok_or_else(|| LibraryError::MeetNotFound(id.to_string()))?;
        Ok(MeetSession::from_stored(
            meet.data.clone(),
            Some(meet.metadata.clone()),
        ))
    }

    /// Saves the session with `status` and points it at the written record.
    pub async fn save(
        &mut self,
        session: &mut MeetSession,
        status: MeetStatus,
    ) -> Result<MeetMetadata, LibraryError> {
        let data = session.to_stored(status);
        let result = self
            .store
            .save(&self.credentials, data, status, session.remote())
            .await?;
        let metadata = result.metadata();
        self.remember(metadata.clone(), result.data);
        session.set_remote(Some(metadata.clone()));
        Ok(metadata)
    }

    /// Publishes the session and returns a share link referencing the stored
    /// record. The token is also written back into the record.
    pub async fn publish(
        &mut self,
        session: &mut MeetSession,
        share_base_url: &str,
    ) -> Result<PublishOutcome, LibraryError> {
        session.validate_for_publish()?;

        let published = self.save(session, MeetStatus::Published).await?;
        let token = encode_share_payload(&SharePayload::remote(published.storage.clone()))?;
        let url = build_share_url(share_base_url, &token);

        let mut data = session.to_stored(MeetStatus::Published);
        data.share_token = Some(token.clone());
        let result = self
            .store
            .save(&self.credentials, data, MeetStatus::Published, Some(&published))
            .await?;
        let metadata = result.metadata();
        self.remember(metadata.clone(), result.data);
        session.set_remote(Some(metadata.clone()));

        let link = PublishedLink {
            id: metadata.id.clone(),
            meet_name: metadata.meet_name.clone(),
            created_at: Utc::now(),
            url: url.clone(),
            events_count: metadata.events_count,
            storage: Some(metadata.storage.clone()),
        };

        Ok(PublishOutcome {
            metadata,
            token,
            url,
            link,
        })
    }

    pub async fn delete(&mut self, metadata: &MeetMetadata) -> Result<(), LibraryError> {
        self.store
            .delete(
                &metadata.storage,
                &metadata.sha,
                &self.credentials,
                Some(&commit_message("Delete meet", &metadata.meet_name, &metadata.id)),
            )
            .await?;
        self.cache.remove(&metadata.id);
        Ok(())
    }

    /// Resolves a share token using this library's store.
    pub async fn resolve_shared(&self, token: &str) -> Result<SharedMeet, LibraryError> {
        resolve_shared(&self.store, token).await
    }

    fn remember(&mut self, metadata: MeetMetadata, data: StoredMeet) {
        self.cache
            .insert(metadata.id.clone(), ListedMeet { metadata, data });
    }
}

/// Decodes a share token. Inline payloads are used as-is; payloads that only
/// reference a stored meet are fetched without credentials.
pub async fn resolve_shared(store: &GitHubStore, token: &str) -> Result<SharedMeet, LibraryError> {
    let payload = decode_share_payload(token)?;

    if payload.has_inline_data() {
        return Ok(SharedMeet {
            meet_info: payload.meet_info.unwrap_or_default(),
            events: from_shareable_events(payload.events.unwrap_or_default()),
            generated_at: payload.generated_at,
            storage: None,
        });
    }

    let pointer = payload.storage.ok_or(LibraryError::EmptyPayload)?;
    let fetched = store.fetch_public(&pointer).await?;
    Ok(SharedMeet {
        meet_info: fetched.data.meet_info,
        events: from_shareable_events(fetched.data.events),
        generated_at: fetched.data.generated_at,
        storage: Some(pointer),
    })
}
