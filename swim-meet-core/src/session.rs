//! In-memory editing state for one meet.
//!
//! A session owns the event table, the meet info, the active filters and
//! the catalog entry of the remote record it was opened from (if any).

use thiserror::Error;
use uuid::Uuid;

use crate::csv::{export_events_csv, parse_events_csv};
use crate::derive::{derive_events, empty_event};
use crate::error::ErrorKind;
use crate::filter::{apply_filters, compute_filter_options, FilterOptions, FilterState};
use crate::models::{
    from_shareable_events, to_shareable_events, Event, MeetData, MeetInfo, MeetMetadata,
    MeetStatus, StoredMeet,
};
use crate::share::SharePayload;

/// Description given to rows the coach adds by hand.
pub const MANUAL_DESCRIPTION: &str = "Manually Added";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("No event with id {0}")]
    EventNotFound(Uuid),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Validation(_) => ErrorKind::Validation,
            SessionError::EventNotFound(_) => ErrorKind::NotFound,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeetSession {
    meet_info: Option<MeetInfo>,
    events: Vec<Event>,
    filters: FilterState,
    remote: Option<MeetMetadata>,
}

impl MeetSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from a fresh extraction, deriving genders and
    /// splitting paired events.
    pub fn from_extraction(data: MeetData) -> Self {
        Self {
            meet_info: Some(data.meet_info),
            events: derive_events(&data.events),
            ..Self::default()
        }
    }

    /// Opens a stored meet for editing. `remote` is its catalog entry when
    /// it came from the store.
    pub fn from_stored(data: StoredMeet, remote: Option<MeetMetadata>) -> Self {
        Self {
            meet_info: Some(data.meet_info),
            events: from_shareable_events(data.events),
            filters: FilterState::default(),
            remote,
        }
    }

    pub fn meet_info(&self) -> Option<&MeetInfo> {
        self.meet_info.as_ref()
    }

    pub fn set_meet_info(&mut self, info: MeetInfo) {
        self.meet_info = Some(info);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: Uuid) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn remote(&self) -> Option<&MeetMetadata> {
        self.remote.as_ref()
    }

    pub fn set_remote(&mut self, remote: Option<MeetMetadata>) {
        self.remote = remote;
    }

    /// Inserts a blank row at the top of the table and returns it.
    pub fn add_event(&mut self) -> &Event {
        let mut event = empty_event();
        event.description = MANUAL_DESCRIPTION.to_string();
        self.events.insert(0, event);
        &self.events[0]
    }

    /// Replaces the event with the same id.
    pub fn update_event(&mut self, updated: Event) -> Result<(), SessionError> {
        let slot = self
            .events
            .iter_mut()
            .find(|event| event.id == updated.id)
            .ok_or(SessionError::EventNotFound(updated.id))?;
        *slot = updated;
        Ok(())
    }

    pub fn delete_event(&mut self, id: Uuid) -> Result<Event, SessionError> {
        let index = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or(SessionError::EventNotFound(id))?;
        Ok(self.events.remove(index))
    }

    /// Swaps in a whole new table, e.g. after a CSV import.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn filter_options(&self) -> FilterOptions {
        compute_filter_options(&self.events)
    }

    pub fn filtered_events(&self) -> Vec<&Event> {
        apply_filters(&self.events, &self.filters)
    }

    /// CSV of the filtered view, or of every event when `all` is set.
    pub fn export_csv(&self, all: bool) -> String {
        if all {
            export_events_csv(&self.events)
        } else {
            export_events_csv(self.filtered_events())
        }
    }

    /// Replaces the table with the rows of `text`; returns how many were read.
    pub fn import_csv(&mut self, text: &str) -> usize {
        self.replace_events(parse_events_csv(text));
        self.events.len()
    }

    /// Blob to persist with `status`. Keeps the share token of the record
    /// this session was opened from.
    pub fn to_stored(&self, status: MeetStatus) -> StoredMeet {
        let mut data = StoredMeet::new(
            self.meet_info.clone().unwrap_or_default(),
            to_shareable_events(&self.events),
        );
        data.status = Some(status);
        data.share_token = self
            .remote
            .as_ref()
            .and_then(|remote| remote.share_token.clone());
        data
    }

    /// Share payload embedding this meet.
    pub fn share_payload_inline(&self) -> SharePayload {
        SharePayload::inline(
            self.meet_info.clone().unwrap_or_default(),
            to_shareable_events(&self.events),
        )
    }

    /// A meet can be published once it has meet info and at least one event.
    pub fn validate_for_publish(&self) -> Result<(), SessionError> {
        if self.meet_info.is_none() {
            return Err(SessionError::Validation(
                "Meet information is required before publishing.".to_string(),
            ));
        }
        if self.events.is_empty() {
            return Err(SessionError::Validation(
                "Add at least one event before publishing.".to_string(),
            ));
        }
        Ok(())
    }
}
