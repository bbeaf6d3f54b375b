use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Models offered for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeminiModel {
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Flash,
    #[serde(rename = "gemini-2.5-pro")]
    Pro,
}

impl GeminiModel {
    pub const ALL: [GeminiModel; 2] = [GeminiModel::Flash, GeminiModel::Pro];

    pub fn id(&self) -> &'static str {
        match self {
            GeminiModel::Flash => "gemini-2.5-flash",
            GeminiModel::Pro => "gemini-2.5-pro",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GeminiModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini-2.5-flash" | "flash" => Ok(GeminiModel::Flash),
            "gemini-2.5-pro" | "pro" => Ok(GeminiModel::Pro),
            _ => Err(format!(
                "Invalid model '{}'. Valid options: gemini-2.5-flash, gemini-2.5-pro",
                s
            )),
        }
    }
}

/// One page (or a whole document) sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PageImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self::new("application/pdf", bytes)
    }
}

/// MIME type for a page file, by extension.
pub fn mime_for_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

// Wire types for generateContent.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataContent,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataContent {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| match part {
                GeminiPart::Text { text } => Some(text.as_str()),
                GeminiPart::InlineData { .. } => None,
            })
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
