use serde_json::{json, Value};

const PROMPT: &str = r#"You are an expert at extracting structured data from documents about swimming competitions.
Analyze the provided pages of a swim meet announcement.
Extract the general meet information AND all individual and relay swimming events into a single, structured JSON object.
The object must have two top-level keys: "meetInfo" and "events".

1. For the "meetInfo" object, extract the following details:
  - meetName: The full, official title of the swim meet.
  - dates: The full date range of the meet (e.g., "November 14-16, 2025").
  - location: The full address of the venue.
  - entryLimits: A brief summary of the entry limitations (e.g., "4 individual events per session").
  - awards: A brief summary of the awards given (e.g., "Medals 1st-3rd, Ribbons 4th-8th for 12 & younger events").
  - sessionDetails: An array of objects, one per distinct session, each containing:
    - session: The name of the session (e.g., "Friday", "Saturday AM", "Saturday PM - 11 & Older").
    - warmUp: The warm-up time for that session.
    - startTime: The start time for that session.

2. For the "events" array, extract all swimming events. For each event, provide:
  - eventNumber: The number or range of numbers for the event (e.g., "1-2", "9-10").
  - ageGroup: The designated age group for the event (e.g., "12 & Under", "Senior", "9 & 10").
  - distance: The numerical distance of the race (e.g., 200, 400, 50).
  - stroke: The swimming stroke. Use common names like "Freestyle", "Backstroke", "Breaststroke", "Butterfly", "Individual Medley", "Freestyle Relay", "Medley Relay". Abbreviate "F.R." as "Freestyle Relay" and "M.R." as "Medley Relay".
  - day: The day and session the event occurs. Use identifiers like "Friday", "Saturday AM", "Saturday PM", "Sunday AM", "Sunday PM". Determine AM/PM sessions based on headers and event sequencing.
  - originalDescription: The full, original, verbatim text for the event line as it appears in the document. For example, "200 Individual Medley". This is for verification.

Important rules:
- Do not include warm-up information in the main "events" array.
- The response must be a valid JSON object and nothing else."#;

/// Instructions sent after the page parts.
pub fn extraction_prompt() -> &'static str {
    PROMPT
}

/// Response schema for `{meetInfo, events}` in Gemini's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "meetInfo": {
                "type": "OBJECT",
                "properties": {
                    "meetName": { "type": "STRING" },
                    "dates": { "type": "STRING" },
                    "location": { "type": "STRING" },
                    "entryLimits": { "type": "STRING" },
                    "awards": { "type": "STRING" },
                    "sessionDetails": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "session": { "type": "STRING" },
                                "warmUp": { "type": "STRING" },
                                "startTime": { "type": "STRING" }
                            },
                            "required": ["session", "warmUp", "startTime"]
                        }
                    }
                },
                "required": ["meetName", "dates", "location", "entryLimits", "awards", "sessionDetails"]
            },
            "events": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "eventNumber": { "type": "STRING" },
                        "ageGroup": { "type": "STRING" },
                        "distance": { "type": "NUMBER" },
                        "stroke": { "type": "STRING" },
                        "day": { "type": "STRING" },
                        "originalDescription": { "type": "STRING" }
                    },
                    "required": ["eventNumber", "ageGroup", "distance", "stroke", "day", "originalDescription"]
                }
            }
        },
        "required": ["meetInfo", "events"]
    })
}
