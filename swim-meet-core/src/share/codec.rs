use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use super::error::ShareError;
use super::payload::SharePayload;

/// Newest payload version this build understands.
pub const CURRENT_SHARE_VERSION: u32 = 1;

const LZ_URI_PREFIX: &str = "lz:";
const BASE64_PREFIX: &str = "b64:";

/// Token formats, in the order decoding tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Current format: lz-string `compressToBase64` output, no prefix.
    LzBase64,
    /// `lz:` followed by lz-string's URI-component alphabet.
    LzUriComponent,
    /// Standard base64 of the JSON, optionally prefixed with `b64:`.
    Base64,
}

impl DecodeStrategy {
    pub const CHAIN: [DecodeStrategy; 3] = [
        DecodeStrategy::LzBase64,
        DecodeStrategy::LzUriComponent,
        DecodeStrategy::Base64,
    ];

    /// Recovers the JSON text from a token, or `None` if the token is not in
    /// this format.
    fn decode(&self, token: &str) -> Option<String> {
        match self {
            DecodeStrategy::LzBase64 => {
                lz_str::decompress_from_base64(token).and_then(|wide| String::from_utf16(&wide).ok())
            }
            DecodeStrategy::LzUriComponent => {
                let body = token.strip_prefix(LZ_URI_PREFIX)?;
                lz_str::decompress_from_encoded_uri_component(body)
                    .and_then(|wide| String::from_utf16(&wide).ok())
            }
            DecodeStrategy::Base64 => {
                let body = token.strip_prefix(BASE64_PREFIX).unwrap_or(token);
                // Query strings turn '+' into ' '.
                let body = body.replace(' ', "+");
                let bytes = STANDARD.decode(body.as_bytes()).ok()?;
                String::from_utf8(bytes).ok()
            }
        }
    }
}

/// Serializes a payload to compact JSON and compresses it into a URL-safe token.
pub fn encode_share_payload(payload: &SharePayload) -> Result<String, ShareError> {
    let json = serde_json::to_string(payload)?;
    let compressed = lz_str::compress_to_base64(json.as_str());
    if compressed.is_empty() {
        return Ok(STANDARD.encode(json.as_bytes()));
    }
    Ok(compressed)
}

/// Decodes a token produced by this or any earlier release.
pub fn decode_share_payload(token: &str) -> Result<SharePayload, ShareError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ShareError::Decode("token is empty".to_string()));
    }

    for strategy in DecodeStrategy::CHAIN {
        let Some(json) = strategy.decode(token) else {
            continue;
        };

        let payload: SharePayload = match serde_json::from_str(&json) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(?strategy, error = %e, "share token did not parse");
                continue;
            }
        };

        if payload.version > CURRENT_SHARE_VERSION {
            return Err(ShareError::UnsupportedVersion {
                found: payload.version,
                supported: CURRENT_SHARE_VERSION,
            });
        }

        debug!(?strategy, "decoded share token");
        return Ok(payload);
    }

    Err(ShareError::Decode(
        "token is not in any known share format".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Gender, MeetInfo, SessionDetail, ShareableEvent, StorageKind, StoragePointer,
    };

    fn sample_events() -> Vec<ShareableEvent> {
        vec![
            ShareableEvent {
                event_number: "9".into(),
                age_group: "9 & 10".into(),
                distance: 50,
                stroke: "Freestyle".into(),
                day: "Saturday AM".into(),
                description: "Girls 9-10 50 Free".into(),
                gender: Gender::Girls,
            },
            ShareableEvent {
                event_number: "R1".into(),
                age_group: "Open".into(),
                distance: 200,
                stroke: "Medley Relay".into(),
                day: "Sunday PM".into(),
                description: "Open 200 Medley Relay, ünïcødé".into(),
                gender: Gender::Mixed,
            },
        ]
    }

    fn sample_info() -> MeetInfo {
        let mut info = MeetInfo::new("Winter Classic");
        info.location = "Aquatic Center".into();
        info.session_details.push(SessionDetail {
            session: "Saturday AM".into(),
            warm_up: "7:00".into(),
            start_time: "8:00".into(),
        });
        info
    }

    fn pointer() -> StoragePointer {
        StoragePointer {
            kind: StorageKind::Github,
            owner: "coach".into(),
            repo: "meets".into(),
            branch: "main".into(),
            path: "public/shares/published".into(),
            id: "5a1d".into(),
        }
    }

    #[test]
    fn test_inline_payload_roundtrip() {
        let payload = SharePayload::inline(sample_info(), sample_events());
        let token = encode_share_payload(&payload).unwrap();
        assert_eq!(decode_share_payload(&token).unwrap(), payload);
    }

    #[test]
    fn test_storage_only_payload_roundtrip() {
        let payload = SharePayload::remote(pointer());
        let token = encode_share_payload(&payload).unwrap();
        let decoded = decode_share_payload(&token).unwrap();
        assert_eq!(decoded, payload);
        assert!(decoded.meet_info.is_none());
        assert!(decoded.events.is_none());
    }

    #[test]
    fn test_token_is_url_safe_and_has_no_prefix() {
        let token = encode_share_payload(&SharePayload::inline(sample_info(), sample_events())).unwrap();
        assert!(!token.starts_with(LZ_URI_PREFIX));
        assert!(!token.starts_with(BASE64_PREFIX));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let payload = SharePayload::remote(pointer());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("meetInfo").is_none());
        assert!(json.get("events").is_none());
        assert_eq!(json["storage"]["type"], "github");
    }

    #[test]
    fn test_decodes_legacy_lz_uri_token() {
        let payload = SharePayload::inline(sample_info(), sample_events());
        let json = serde_json::to_string(&payload).unwrap();
        let token = format!(
            "lz:{}",
            lz_str::compress_to_encoded_uri_component(json.as_str())
        );
        assert_eq!(decode_share_payload(&token).unwrap(), payload);
    }

    #[test]
    fn test_decodes_legacy_base64_tokens() {
        let payload = SharePayload::inline(sample_info(), sample_events());
        let encoded = STANDARD.encode(serde_json::to_string(&payload).unwrap());

        assert_eq!(
            decode_share_payload(&format!("b64:{}", encoded)).unwrap(),
            payload
        );
        assert_eq!(decode_share_payload(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_decodes_token_without_generated_at() {
        let json = r#"{"version":1,"meetInfo":{"meetName":"Winter Classic"},"events":[]}"#;
        let token = lz_str::compress_to_base64(json);

        let payload = decode_share_payload(&token).unwrap();
        assert_eq!(payload.meet_info.unwrap().meet_name, "Winter Classic");
        assert_eq!(payload.events, Some(Vec::new()));
    }

    #[test]
    fn test_rejects_garbage() {
        for token in ["", "   ", "not a token", "b64:!!!!", "lz:%%%"] {
            assert!(
                matches!(decode_share_payload(token), Err(ShareError::Decode(_))),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_rejects_newer_version() {
        let mut payload = SharePayload::remote(pointer());
        payload.version = CURRENT_SHARE_VERSION + 1;
        let token = encode_share_payload(&payload).unwrap();

        match decode_share_payload(&token) {
            Err(ShareError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 2);
                assert_eq!(supported, 1);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }
}
