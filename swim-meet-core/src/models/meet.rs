use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::RawEvent;
use super::lenient;

/// Timing details for one session of a meet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(default, deserialize_with = "lenient::string")]
    pub session: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub warm_up: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_time: String,
}

/// Meet-level information printed at the top of an announcement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub meet_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub entry_limits: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub awards: String,
    #[serde(default)]
    pub session_details: Vec<SessionDetail>,
}

impl MeetInfo {
    pub fn new(meet_name: impl Into<String>) -> Self {
        Self {
            meet_name: meet_name.into(),
            ..Self::default()
        }
    }

    /// Display name, falling back to a placeholder for unnamed meets.
    pub fn display_name(&self) -> &str {
        let name = self.meet_name.trim();
        if name.is_empty() {
            "Untitled Meet"
        } else {
            name
        }
    }
}

impl fmt::Display for MeetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.display_name();
        writeln!(f, "{}", name)?;
        writeln!(f, "{}", "=".repeat(name.chars().count()))?;
        if !self.dates.is_empty() {
            writeln!(f, "Dates: {}", self.dates)?;
        }
        if !self.location.is_empty() {
            writeln!(f, "Location: {}", self.location)?;
        }
        if !self.entry_limits.is_empty() {
            writeln!(f, "Entry limits: {}", self.entry_limits)?;
        }
        if !self.awards.is_empty() {
            writeln!(f, "Awards: {}", self.awards)?;
        }

        if !self.session_details.is_empty() {
            writeln!(f, "\nSessions:")?;
            for detail in &self.session_details {
                writeln!(
                    f,
                    "  - {}: warm-up {}, start {}",
                    detail.session, detail.warm_up, detail.start_time
                )?;
            }
        }

        Ok(())
    }
}

/// Everything the extraction model returns for one announcement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetData {
    pub meet_info: MeetInfo,
    pub events: Vec<RawEvent>,
}
