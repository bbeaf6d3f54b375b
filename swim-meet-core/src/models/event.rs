use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Girls,
    Boys,
    #[default]
    Mixed,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Girls => "Girls",
            Gender::Boys => "Boys",
            Gender::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "girls" => Ok(Gender::Girls),
            "boys" => Ok(Gender::Boys),
            "mixed" => Ok(Gender::Mixed),
            _ => Err(format!(
                "Invalid gender '{}'. Valid options: Girls, Boys, Mixed",
                s
            )),
        }
    }
}

/// An event exactly as the extraction model reported it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient::string")]
    pub event_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub age_group: String,
    #[serde(default, deserialize_with = "lenient::distance")]
    pub distance: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub stroke: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub day: String,
    #[serde(
        default,
        rename = "originalDescription",
        alias = "description",
        deserialize_with = "lenient::string"
    )]
    pub description: String,
}

/// An editable event. The `id` only identifies the row inside one editing
/// session and is never written to CSV, share tokens or stored meets.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub event_number: String,
    pub day: String,
    pub age_group: String,
    pub gender: Gender,
    pub distance: u32,
    pub stroke: String,
    pub description: String,
}

impl Event {
    pub fn from_raw(raw: &RawEvent, event_number: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_number: event_number.into(),
            day: raw.day.clone(),
            age_group: raw.age_group.clone(),
            gender,
            distance: raw.distance,
            stroke: raw.stroke.clone(),
            description: raw.description.clone(),
        }
    }

    /// Rebuilds an event from its persisted form, assigning a fresh id.
    pub fn from_shareable(event: ShareableEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_number: event.event_number,
            day: event.day,
            age_group: event.age_group,
            gender: event.gender,
            distance: event.distance,
            stroke: event.stroke,
            description: event.description,
        }
    }

    pub fn to_shareable(&self) -> ShareableEvent {
        ShareableEvent {
            event_number: self.event_number.clone(),
            age_group: self.age_group.clone(),
            distance: self.distance,
            stroke: self.stroke.clone(),
            day: self.day.clone(),
            description: self.description.clone(),
            gender: self.gender,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} {}",
            self.event_number, self.age_group, self.gender, self.distance, self.stroke
        )?;
        if !self.day.is_empty() {
            write!(f, " ({})", self.day)?;
        }
        Ok(())
    }
}

/// The id-less event form used by CSV export, share tokens and stored meets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareableEvent {
    #[serde(default, deserialize_with = "lenient::string")]
    pub event_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub age_group: String,
    #[serde(default, deserialize_with = "lenient::distance")]
    pub distance: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub stroke: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub day: String,
    #[serde(
        default,
        rename = "originalDescription",
        alias = "description",
        deserialize_with = "lenient::string"
    )]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::gender")]
    pub gender: Gender,
}

pub fn to_shareable_events(events: &[Event]) -> Vec<ShareableEvent> {
    events.iter().map(Event::to_shareable).collect()
}

pub fn from_shareable_events(events: Vec<ShareableEvent>) -> Vec<Event> {
    events.into_iter().map(Event::from_shareable).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_str() {
        assert_eq!(Gender::from_str("girls").unwrap(), Gender::Girls);
        assert_eq!(Gender::from_str("BOYS").unwrap(), Gender::Boys);
        assert_eq!(Gender::from_str(" Mixed ").unwrap(), Gender::Mixed);
        assert!(Gender::from_str("coed").is_err());
    }

    #[test]
    fn test_raw_event_accepts_model_quirks() {
        let json = r#"{
            "eventNumber": 7,
            "ageGroup": "10 & Under",
            "distance": 50.0,
            "stroke": "Freestyle",
            "day": null,
            "originalDescription": "50 Free"
        }"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.event_number, "7");
        assert_eq!(raw.distance, 50);
        assert_eq!(raw.day, "");
        assert_eq!(raw.description, "50 Free");
    }

    #[test]
    fn test_raw_event_description_alias() {
        let raw: RawEvent =
            serde_json::from_str(r#"{"eventNumber":"1","description":"Relay"}"#).unwrap();
        assert_eq!(raw.description, "Relay");
        assert_eq!(raw.distance, 0);
    }

    #[test]
    fn test_shareable_event_json_has_no_id() {
        let event = Event {
            id: Uuid::new_v4(),
            event_number: "3".into(),
            day: "Friday".into(),
            age_group: "11-12".into(),
            gender: Gender::Girls,
            distance: 100,
            stroke: "Backstroke".into(),
            description: "100 Back".into(),
        };
        let json = serde_json::to_value(event.to_shareable()).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["originalDescription"], "100 Back");
        assert_eq!(json["gender"], "Girls");
    }

    #[test]
    fn test_from_shareable_regenerates_ids() {
        let shareable = vec![ShareableEvent::default(), ShareableEvent::default()];
        let events = from_shareable_events(shareable);
        assert_eq!(events.len(), 2);
        assert_ne!(events[0].id, events[1].id);
    }

    #[test]
    fn test_unknown_gender_becomes_mixed() {
        let event: ShareableEvent =
            serde_json::from_str(r#"{"eventNumber":"4","gender":"Coed"}"#).unwrap();
        assert_eq!(event.gender, Gender::Mixed);
    }
}
