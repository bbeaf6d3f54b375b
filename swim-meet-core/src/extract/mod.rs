//! Meet extraction through the Gemini `generateContent` API.
//!
//! Page images (or a whole PDF) go out as inline data next to a fixed
//! prompt and response schema; the model answers with `{meetInfo, events}`.

mod client;
mod error;
mod prompt;
mod types;

pub use client::{parse_meet_data, ExtractionClient, GEMINI_API_BASE};
pub use error::ExtractError;
pub use prompt::{extraction_prompt, response_schema};
pub use types::{mime_for_extension, GeminiModel, PageImage};
