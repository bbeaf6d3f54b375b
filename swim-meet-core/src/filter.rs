//! Filter options and conjunctive filtering over an event table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Event;

/// Filter value that matches every event.
pub const ALL: &str = "all";

/// Current selection for each filterable column. `"all"` disables a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub day: String,
    pub age_group: String,
    pub stroke: String,
    pub distance: String,
    pub gender: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            day: ALL.to_string(),
            age_group: ALL.to_string(),
            stroke: ALL.to_string(),
            distance: ALL.to_string(),
            gender: ALL.to_string(),
        }
    }
}

impl FilterState {
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, event: &Event) -> bool {
        field_matches(&self.day, &event.day)
            && field_matches(&self.age_group, &event.age_group)
            && field_matches(&self.stroke, &event.stroke)
            && field_matches(&self.distance, &event.distance.to_string())
            && field_matches(&self.gender, event.gender.as_str())
    }
}

fn field_matches(filter: &str, value: &str) -> bool {
    filter == ALL || filter == value
}

/// Distinct values per column, each list starting with `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub days: Vec<String>,
    pub age_groups: Vec<String>,
    pub strokes: Vec<String>,
    pub distances: Vec<String>,
    pub genders: Vec<String>,
}

/// Collects the selectable values of every column.
///
/// Text columns sort lexicographically. Distances sort numerically, so `50`
/// comes before `100`; a distance of `0` means "unknown" and is not offered.
pub fn compute_filter_options(events: &[Event]) -> FilterOptions {
    let mut days = BTreeSet::new();
    let mut age_groups = BTreeSet::new();
    let mut strokes = BTreeSet::new();
    let mut distances = BTreeSet::new();
    let mut genders = BTreeSet::new();

    for event in events {
        insert_non_empty(&mut days, &event.day);
        insert_non_empty(&mut age_groups, &event.age_group);
        insert_non_empty(&mut strokes, &event.stroke);
        if event.distance > 0 {
            distances.insert(event.distance);
        }
        genders.insert(event.gender.as_str());
    }

    FilterOptions {
        days: with_all(days),
        age_groups: with_all(age_groups),
        strokes: with_all(strokes),
        distances: with_all(distances.into_iter().map(|d| d.to_string())),
        genders: with_all(genders.into_iter().map(str::to_string)),
    }
}

fn insert_non_empty<'a>(set: &mut BTreeSet<&'a str>, value: &'a str) {
    if !value.is_empty() && value != ALL {
        set.insert(value);
    }
}

fn with_all<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    std::iter::once(ALL.to_string())
        .chain(values.into_iter().map(Into::into))
        .collect()
}

/// Keeps the events matching every column of `filters`, in their original order.
pub fn apply_filters<'a>(events: &'a [Event], filters: &FilterState) -> Vec<&'a Event> {
    events.iter().filter(|event| filters.matches(event)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use uuid::Uuid;

    fn event(number: &str, day: &str, age: &str, gender: Gender, distance: u32, stroke: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            event_number: number.into(),
            day: day.into(),
            age_group: age.into(),
            gender,
            distance,
            stroke: stroke.into(),
            description: String::new(),
        }
    }

    fn sample() -> Vec<Event> {
        vec![
            event("1", "Saturday AM", "10 & Under", Gender::Girls, 100, "Freestyle"),
            event("2", "Saturday AM", "10 & Under", Gender::Boys, 100, "Freestyle"),
            event("3", "Sunday PM", "11-12", Gender::Girls, 50, "Backstroke"),
            event("R1", "Sunday PM", "Open", Gender::Mixed, 200, "Medley Relay"),
            event("5", "", "", Gender::Girls, 0, ""),
        ]
    }

    #[test]
    fn test_all_filters_return_everything_in_order() {
        let events = sample();
        let filtered = apply_filters(&events, &FilterState::default());
        let ids: Vec<_> = filtered.iter().map(|e| e.id).collect();
        let expected: Vec<_> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let events = sample();
        let filters = FilterState {
            day: "Saturday AM".into(),
            gender: "Boys".into(),
            ..FilterState::default()
        };
        let filtered = apply_filters(&events, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].event_number, "2");
    }

    #[test]
    fn test_distance_compared_as_string() {
        let events = sample();
        let filters = FilterState {
            distance: "100".into(),
            ..FilterState::default()
        };
        let numbers: Vec<_> = apply_filters(&events, &filters)
            .iter()
            .map(|e| e.event_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let events = sample();
        let filters = FilterState {
            stroke: "Butterfly".into(),
            ..FilterState::default()
        };
        assert!(apply_filters(&events, &filters).is_empty());
    }

    #[test]
    fn test_compute_filter_options() {
        let options = compute_filter_options(&sample());
        assert_eq!(options.days, vec!["all", "Saturday AM", "Sunday PM"]);
        assert_eq!(options.age_groups, vec!["all", "10 & Under", "11-12", "Open"]);
        assert_eq!(
            options.strokes,
            vec!["all", "Backstroke", "Freestyle", "Medley Relay"]
        );
        assert_eq!(options.distances, vec!["all", "50", "100", "200"]);
        assert_eq!(options.genders, vec!["all", "Boys", "Girls", "Mixed"]);
    }

    #[test]
    fn test_filter_options_empty_collection() {
        let options = compute_filter_options(&[]);
        assert_eq!(options.days, vec!["all"]);
        assert_eq!(options.distances, vec!["all"]);
        assert_eq!(options.genders, vec!["all"]);
    }

    #[test]
    fn test_default_state_is_unfiltered() {
        assert!(FilterState::default().is_unfiltered());
        let filters = FilterState {
            day: "Friday".into(),
            ..FilterState::default()
        };
        assert!(!filters.is_unfiltered());
    }
}
