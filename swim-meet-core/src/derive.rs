//! Turns extracted events into editable events with a gender.
//!
//! Meet announcements number girls' events odd and boys' events even. A
//! combined line such as `9-10` is one girls' and one boys' race, so it is
//! split in two. Anything that does not follow the convention (relay codes,
//! non-adjacent ranges) is kept as a single `Mixed` event.

use crate::models::{Event, Gender, RawEvent};

pub fn derive_events(raw_events: &[RawEvent]) -> Vec<Event> {
    let mut derived = Vec::with_capacity(raw_events.len());

    for raw in raw_events {
        if raw.event_number.contains('-') {
            match paired_range(&raw.event_number) {
                Some((start, end)) => {
                    derived.push(Event::from_raw(raw, start.to_string(), Gender::Girls));
                    derived.push(Event::from_raw(raw, end.to_string(), Gender::Boys));
                }
                None => derived.push(Event::from_raw(raw, &raw.event_number, Gender::Mixed)),
            }
        } else {
            let gender = gender_for_number(&raw.event_number);
            derived.push(Event::from_raw(raw, &raw.event_number, gender));
        }
    }

    derived
}

/// Gender implied by a single event number: odd is girls, even is boys.
pub fn gender_for_number(event_number: &str) -> Gender {
    match parse_leading_int(event_number) {
        Some(n) if n.rem_euclid(2) == 1 => Gender::Girls,
        Some(_) => Gender::Boys,
        None => Gender::Mixed,
    }
}

/// A blank row for manual entry.
pub fn empty_event() -> Event {
    Event::from_raw(&RawEvent::default(), "", Gender::Mixed)
}

/// Returns `(start, end)` when a `start-end` range is an odd number followed
/// by its successor.
fn paired_range(event_number: &str) -> Option<(i64, i64)> {
    let mut tokens = event_number.split('-');
    let start = parse_leading_int(tokens.next()?)?;
    let end = parse_leading_int(tokens.next()?)?;

    if start.rem_euclid(2) == 1 && start.checked_add(1) == Some(end) {
        Some((start, end))
    } else {
        None
    }
}

/// Parses the leading integer of a string: optional whitespace, an optional
/// sign, then at least one digit. Trailing text is ignored (`"12A"` is 12).
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
