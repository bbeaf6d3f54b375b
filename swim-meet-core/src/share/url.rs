use super::error::ShareError;

/// Query parameter carrying the token in a share link.
pub const SHARE_QUERY_PARAM: &str = "shared";

/// Builds `<base>?shared=<token>`, or appends with `&` when `base` already
/// has a query string.
pub fn build_share_url(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        base,
        separator,
        SHARE_QUERY_PARAM,
        urlencoding::encode(token)
    )
}

/// Pulls the token out of a share link. Input without a `shared=` parameter
/// that is not a URL is taken to be a bare token.
pub fn extract_share_token(input: &str) -> Result<String, ShareError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ShareError::MissingToken(input.to_string()));
    }

    let Some((_, query)) = input.split_once('?') else {
        if input.contains("://") {
            return Err(ShareError::MissingToken(input.to_string()));
        }
        return Ok(input.to_string());
    };

    let query = query.split('#').next().unwrap_or_default();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key != SHARE_QUERY_PARAM || value.is_empty() {
            continue;
        }
        return urlencoding::decode(value)
            .map(|token| token.into_owned())
            .map_err(|e| ShareError::Decode(format!("invalid percent-encoding: {}", e)));
    }

    Err(ShareError::MissingToken(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_share_url() {
        assert_eq!(
            build_share_url("https://swim-meet.app/", "ab+c/d="),
            "https://swim-meet.app/?shared=ab%2Bc%2Fd%3D"
        );
        assert_eq!(
            build_share_url("https://example.com/app?tab=shared", "xyz"),
            "https://example.com/app?tab=shared&shared=xyz"
        );
    }

    #[test]
    fn test_extract_from_url_roundtrip() {
        let url = build_share_url("https://swim-meet.app/", "ab+c/d==");
        assert_eq!(extract_share_token(&url).unwrap(), "ab+c/d==");
    }

    #[test]
    fn test_extract_ignores_other_params_and_fragment() {
        let token =
            extract_share_token("https://swim-meet.app/?tab=shared&shared=abc#top").unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_extract_bare_token() {
        assert_eq!(extract_share_token("  N4Ig  ").unwrap(), "N4Ig");
    }

    #[test]
    fn test_extract_missing_token() {
        assert!(matches!(
            extract_share_token("https://swim-meet.app/"),
            Err(ShareError::MissingToken(_))
        ));
        assert!(matches!(
            extract_share_token("https://swim-meet.app/?tab=drafts"),
            Err(ShareError::MissingToken(_))
        ));
        assert!(extract_share_token("").is_err());
    }
}
