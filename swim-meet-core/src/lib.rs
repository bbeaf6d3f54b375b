//! Swim Meet Core Library
//!
//! Event extraction, editing, CSV and share-link handling, and GitHub-backed
//! storage for swim meet announcements.

pub mod csv;
pub mod derive;
pub mod error;
pub mod extract;
pub mod filter;
pub mod library;
pub mod links;
pub mod models;
pub mod pdf;
pub mod session;
pub mod settings;
pub mod share;
pub mod store;

pub use csv::{export_events_csv, parse_events_csv, CSV_HEADERS, IMPORTED_DESCRIPTION};
pub use derive::{derive_events, empty_event, gender_for_number};
pub use error::ErrorKind;
pub use extract::{ExtractError, ExtractionClient, GeminiModel, PageImage};
pub use filter::{apply_filters, compute_filter_options, FilterOptions, FilterState};
pub use library::{resolve_shared, LibraryError, MeetLibrary, PublishOutcome, SharedMeet};
pub use links::{LinksError, PublishedLinks};
pub use models::{
    Event, Gender, MeetData, MeetInfo, MeetMetadata, MeetStatus, PublishedLink, RawEvent,
    SessionDetail, ShareableEvent, StorageKind, StoragePointer, StoredMeet,
};
pub use pdf::{load_pdf_file, FetchError, PdfDocument, PdfFetcher, ProxyConfig};
pub use session::{MeetSession, SessionError};
pub use settings::{
    FileSettingsStore, MemorySettingsStore, SettingKey, Settings, SettingsError, SettingsStore,
};
pub use share::{
    build_share_url, decode_share_payload, encode_share_payload, extract_share_token, ShareError,
    SharePayload, CURRENT_SHARE_VERSION,
};
pub use store::{GitHubStore, StorageCredentials, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
