mod event;
mod lenient;
mod meet;
mod stored;

pub use event::{from_shareable_events, to_shareable_events, Event, Gender, RawEvent, ShareableEvent};
pub use lenient::parse_distance;
pub use meet::{MeetData, MeetInfo, SessionDetail};
pub use stored::{
    MeetMetadata, MeetStatus, PublishedLink, StorageKind, StoragePointer, StoredMeet,
    SCHEMA_VERSION,
};
