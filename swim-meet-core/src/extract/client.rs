use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::{debug, info};

use super::error::ExtractError;
use super::prompt::{extraction_prompt, response_schema};
use super::types::{
    GeminiContent, GeminiModel, GeminiPart, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineDataContent, PageImage,
};
use crate::models::MeetData;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Client for extracting meet data from announcement pages.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl ExtractionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_base(api_key, GEMINI_API_BASE)
    }

    pub fn with_api_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: GeminiModel) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base,
            model.id()
        )
    }

    /// Sends every page followed by the prompt and parses the answer.
    pub async fn extract(
        &self,
        pages: &[PageImage],
        model: GeminiModel,
    ) -> Result<MeetData, ExtractError> {
        if self.api_key.trim().is_empty() {
            return Err(ExtractError::MissingApiKey);
        }
        if pages.is_empty() {
            return Err(ExtractError::NoPages);
        }

        let mut parts: Vec<GeminiPart> = pages
            .iter()
            .map(|page| GeminiPart::InlineData {
                inline_data: InlineDataContent {
                    mime_type: page.mime_type.clone(),
                    data: STANDARD.encode(&page.bytes),
                },
            })
            .collect();
        parts.push(GeminiPart::Text {
            text: extraction_prompt().to_string(),
        });

        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let url = self.endpoint(model);
        debug!(model = %model, pages = pages.len(), "requesting extraction");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.trim())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(ExtractError::Api { status, message });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::InvalidFormat(e.to_string()))?;
        let text = body.text().ok_or(ExtractError::EmptyResponse)?;
        let data = parse_meet_data(&text)?;

        info!(events = data.events.len(), "extracted meet data");
        Ok(data)
    }
}

/// Parses model output, requiring a `meetInfo` object and an `events` array.
pub fn parse_meet_data(text: &str) -> Result<MeetData, ExtractError> {
    let value: Value = serde_json::from_str(strip_code_fence(text.trim()))
        .map_err(|e| ExtractError::InvalidFormat(e.to_string()))?;

    let shaped = value.get("meetInfo").is_some_and(Value::is_object)
        && value.get("events").is_some_and(Value::is_array);
    if !shaped {
        return Err(ExtractError::InvalidFormat(
            "API did not return the expected JSON object structure.".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ExtractError::InvalidFormat(e.to_string()))
}

/// Models sometimes wrap JSON in a Markdown fence despite the mime type.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MEET_JSON: &str = r#"{
        "meetInfo": {
            "meetName": "Winter Classic",
            "dates": "Jan 10-12",
            "location": "Aquatic Center",
            "entryLimits": "",
            "awards": "",
            "sessionDetails": []
        },
        "events": [
            {"eventNumber": "1-2", "ageGroup": "10 & Under", "distance": 50,
             "stroke": "Freestyle", "day": "Saturday AM", "originalDescription": "50 Free"}
        ]
    }"#;

    fn gemini_reply(text: &str) -> Value {
        json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn test_parse_meet_data() {
        let data = parse_meet_data(MEET_JSON).unwrap();
        assert_eq!(data.meet_info.meet_name, "Winter Classic");
        assert_eq!(data.events.len(), 1);
        assert_eq!(data.events[0].event_number, "1-2");
    }

    #[test]
    fn test_parse_meet_data_strips_fence() {
        let fenced = format!("```json\n{}\n```", MEET_JSON);
        assert!(parse_meet_data(&fenced).is_ok());
    }

    #[test]
    fn test_parse_meet_data_rejects_wrong_shape() {
        for text in [
            "not json",
            "[]",
            r#"{"meetInfo": {}}"#,
            r#"{"meetInfo": {}, "events": {}}"#,
            r#"{"events": []}"#,
        ] {
            assert!(
                matches!(parse_meet_data(text), Err(ExtractError::InvalidFormat(_))),
                "{}",
                text
            );
        }
    }

    #[tokio::test]
    async fn test_extract_sends_pages_then_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .and(header("x-goog-api-key", "key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(MEET_JSON)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ExtractionClient::with_api_base("key-123", server.uri());
        let pages = vec![
            PageImage::new("image/jpeg", vec![1, 2, 3]),
            PageImage::new("image/jpeg", vec![4, 5, 6]),
        ];
        let data = client.extract(&pages, GeminiModel::Pro).await.unwrap();
        assert_eq!(data.meet_info.location, "Aquatic Center");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], STANDARD.encode([1u8, 2, 3]));
        assert!(parts[2]["text"].as_str().unwrap().contains("meetInfo"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[tokio::test]
    async fn test_extract_without_key_makes_no_request() {
        let server = MockServer::start().await;
        let client = ExtractionClient::with_api_base("  ", server.uri());
        let err = client
            .extract(&[PageImage::pdf(b"%PDF-1.4".to_vec())], GeminiModel::Flash)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::MissingApiKey));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "error": { "code": 403, "message": "API key invalid" } })),
            )
            .mount(&server)
            .await;

        let client = ExtractionClient::with_api_base("bad", server.uri());
        let err = client
            .extract(&[PageImage::pdf(vec![0])], GeminiModel::Flash)
            .await
            .unwrap_err();
        match err {
            ExtractError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key invalid");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_empty_and_invalid_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Sorry, no.")))
            .mount(&server)
            .await;

        let client = ExtractionClient::with_api_base("key", server.uri());
        let pages = [PageImage::pdf(vec![0])];
        assert!(matches!(
            client.extract(&pages, GeminiModel::Flash).await,
            Err(ExtractError::EmptyResponse)
        ));
        assert!(matches!(
            client.extract(&pages, GeminiModel::Pro).await,
            Err(ExtractError::InvalidFormat(_))
        ));
    }
}
