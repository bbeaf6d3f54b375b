//! CSV import and export of the event table.
//!
//! Export writes a fixed column order. Import is forgiving about column order,
//! header spelling and missing columns so spreadsheets edited by hand still load.

use crate::derive::parse_leading_int;
use crate::models::{Event, Gender};
use uuid::Uuid;

/// Header row written by [`export_events_csv`].
pub const CSV_HEADERS: [&str; 7] = [
    "eventNumber",
    "day",
    "ageGroup",
    "gender",
    "distance",
    "stroke",
    "originalDescription",
];

/// Description given to rows imported from a file without a description column.
pub const IMPORTED_DESCRIPTION: &str = "Imported";

const EVENT_NUMBER_NAMES: &[&str] = &["eventnumber", "event_number", "event #", "event"];
const DAY_NAMES: &[&str] = &["day"];
const AGE_GROUP_NAMES: &[&str] = &["agegroup", "age_group", "age group"];
const GENDER_NAMES: &[&str] = &["gender"];
const DISTANCE_NAMES: &[&str] = &["distance"];
const STROKE_NAMES: &[&str] = &["stroke"];
const DESCRIPTION_NAMES: &[&str] = &[
    "originaldescription",
    "original_description",
    "description",
    "original description",
];

pub fn export_events_csv<'a, I>(events: I) -> String
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut lines = vec![csv_row(CSV_HEADERS.iter().map(|h| h.to_string()))];

    for event in events {
        lines.push(csv_row([
            event.event_number.clone(),
            event.day.clone(),
            event.age_group.clone(),
            event.gender.to_string(),
            event.distance.to_string(),
            event.stroke.clone(),
            event.description.clone(),
        ]));
    }

    lines.join("\n")
}

fn csv_row<I>(values: I) -> String
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .map(|value| escape_field(&value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quotes a field when it holds a delimiter, a quote, a line break, or
/// surrounding whitespace that an unquoted read would trim.
fn escape_field(value: &str) -> String {
    let needs_quotes =
        value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) || value.trim() != value;
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parses CSV text into events. The first non-blank record is the header;
/// every following record becomes one event with a fresh id.
pub fn parse_events_csv(text: &str) -> Vec<Event> {
    let mut records = parse_records(text).into_iter();
    let headers: Vec<String> = match records.next() {
        Some(header) => header.iter().map(|h| h.trim().to_lowercase()).collect(),
        None => return Vec::new(),
    };
    let columns = Columns::resolve(&headers);

    records.map(|row| columns.event(&row)).collect()
}

struct Columns {
    event_number: Vec<usize>,
    day: Vec<usize>,
    age_group: Vec<usize>,
    gender: Vec<usize>,
    distance: Vec<usize>,
    stroke: Vec<usize>,
    description: Vec<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Self {
        let find = |names: &[&str]| -> Vec<usize> {
            names
                .iter()
                .filter_map(|name| headers.iter().position(|h| h == name))
                .collect()
        };

        Self {
            event_number: find(EVENT_NUMBER_NAMES),
            day: find(DAY_NAMES),
            age_group: find(AGE_GROUP_NAMES),
            gender: find(GENDER_NAMES),
            distance: find(DISTANCE_NAMES),
            stroke: find(STROKE_NAMES),
            description: find(DESCRIPTION_NAMES),
        }
    }

    fn event(&self, row: &[String]) -> Event {
        let description = if self.description.is_empty() {
            IMPORTED_DESCRIPTION.to_string()
        } else {
            value(row, &self.description)
        };

        Event {
            id: Uuid::new_v4(),
            event_number: value(row, &self.event_number),
            day: value(row, &self.day),
            age_group: value(row, &self.age_group),
            gender: value(row, &self.gender).parse().unwrap_or(Gender::Mixed),
            distance: parse_leading_int(&value(row, &self.distance))
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
            stroke: value(row, &self.stroke),
            description,
        }
    }
}

/// First non-empty value among the candidate columns.
fn value(row: &[String], columns: &[usize]) -> String {
    columns
        .iter()
        .filter_map(|&index| row.get(index))
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default()
}

#[derive(Default)]
struct FieldBuilder {
    value: String,
    pending_whitespace: String,
    quoted: bool,
}

impl FieldBuilder {
    fn push_unquoted(&mut self, c: char) {
        if c == ' ' || c == '\t' {
            if !self.value.is_empty() {
                self.pending_whitespace.push(c);
            }
        } else {
            self.flush_whitespace();
            self.value.push(c);
        }
    }

    fn push_quoted(&mut self, c: char) {
        self.flush_whitespace();
        self.value.push(c);
    }

    fn flush_whitespace(&mut self) {
        if !self.pending_whitespace.is_empty() {
            self.value.push_str(&self.pending_whitespace);
            self.pending_whitespace.clear();
        }
    }

    fn finish(&mut self) -> (String, bool) {
        let field = std::mem::take(self);
        (field.value, field.quoted)
    }
}

fn end_field(record: &mut Vec<String>, field: &mut FieldBuilder, has_content: &mut bool) {
    let (value, quoted) = field.finish();
    if quoted || !value.is_empty() {
        *has_content = true;
    }
    record.push(value);
}

/// Splits text into records of fields. Quoted fields may contain commas,
/// doubled quotes and line breaks. Blank records are dropped.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut record_has_content = false;
    let mut field = FieldBuilder::default();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push_quoted('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push_quoted(c);
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                field.quoted = true;
            }
            ',' => end_field(&mut record, &mut field, &mut record_has_content),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                end_field(&mut record, &mut field, &mut record_has_content);
                if record_has_content {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
                record_has_content = false;
            }
            other => field.push_unquoted(other),
        }
    }

    end_field(&mut record, &mut field, &mut record_has_content);
    if record_has_content {
        records.push(record);
    }

    records
}
