use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec::CURRENT_SHARE_VERSION;
use crate::models::{MeetInfo, ShareableEvent, StoragePointer};

/// Snapshot carried by a share token.
///
/// Either `meet_info`/`events` are embedded, or `storage` points at the record
/// holding them. Absent fields are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub version: u32,
    /// Early links left this out; they decode as generated now.
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet_info: Option<MeetInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<ShareableEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StoragePointer>,
}

impl SharePayload {
    pub fn inline(meet_info: MeetInfo, events: Vec<ShareableEvent>) -> Self {
        Self {
            version: CURRENT_SHARE_VERSION,
            generated_at: Utc::now(),
            meet_info: Some(meet_info),
            events: Some(events),
            storage: None,
        }
    }

    pub fn remote(storage: StoragePointer) -> Self {
        Self {
            version: CURRENT_SHARE_VERSION,
            generated_at: Utc::now(),
            meet_info: None,
            events: None,
            storage: Some(storage),
        }
    }

    /// True when the payload carries the meet itself rather than a pointer.
    pub fn has_inline_data(&self) -> bool {
        self.meet_info.is_some() || self.events.is_some()
    }
}
