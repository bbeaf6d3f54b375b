//! Loading meet announcement PDFs from disk or through CORS proxies.
//!
//! Announcement links often point at hosts that block direct downloads, so
//! remote PDFs are fetched through a list of proxy templates tried in order.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ErrorKind;

/// Placeholder replaced by the percent-encoded target URL.
pub const URL_PLACEHOLDER: &str = "{{url}}";
pub const DEFAULT_PROXY_URL: &str = "https://corsproxy.io/?{{url}}";
pub const ALLORIGINS_PROXY_URL: &str = "https://api.allorigins.win/raw?url={{url}}";
pub const CORS_SH_PROXY_URL: &str = "https://proxy.cors.sh/{{url}}";

const CORS_SH_KEY_HEADER: &str = "x-cors-api-key";
const PDF_SIGNATURE: &[u8] = b"%PDF";
const PDF_MIME_TYPE: &str = "application/pdf";
const REMOTE_FILE_NAME: &str = "downloaded_meet_announcement.pdf";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unable to download PDF via configured proxies. {}", .0.join(" | "))]
    AllProxiesFailed(Vec<String>),

    #[error("Failed to read '{}': {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),

    #[error("'{}' is not a PDF file", .0.display())]
    NotPdf(PathBuf),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::AllProxiesFailed(_) => ErrorKind::Network,
            FetchError::Read(..) => ErrorKind::NotFound,
            FetchError::NotPdf(_) => ErrorKind::Validation,
        }
    }
}

/// Proxy preferences. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub proxy_url: Option<String>,
    pub api_key: Option<String>,
}

impl ProxyConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCandidate {
    pub template: String,
    pub label: &'static str,
    /// Value for the `x-cors-api-key` header, sent only to proxy.cors.sh.
    pub api_key: Option<String>,
}

/// A downloaded or loaded PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Display for PdfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.file_name, self.bytes.len())
    }
}

/// Expands a proxy template for `target`.
///
/// `{{url}}` is replaced by the encoded target. Without a placeholder the
/// template's ending decides: `=` appends the encoded target, `/` appends it
/// raw, and a query string gains a `url=` parameter unless it already has one.
pub fn build_proxied_url(template: &str, target: &str) -> String {
    if template.is_empty() {
        return target.to_string();
    }

    let encoded = urlencoding::encode(target);
    if template.contains(URL_PLACEHOLDER) {
        return template.replacen(URL_PLACEHOLDER, &encoded, 1);
    }
    if template.ends_with('=') {
        return format!("{}{}", template, encoded);
    }
    if template.ends_with('/') {
        return format!("{}{}", template, target);
    }
    if template.contains('?') {
        if has_url_param(template) {
            return format!("{}{}", template, encoded);
        }
        let separator = if template.ends_with('?') || template.ends_with('&') {
            ""
        } else {
            "&"
        };
        return format!("{}{}url={}", template, separator, encoded);
    }
    format!("{}{}", template, encoded)
}

fn has_url_param(template: &str) -> bool {
    let lower = template.to_lowercase();
    lower.contains("?url=") || lower.contains("&url=")
}

/// Ordered, de-duplicated proxies to try.
pub fn proxy_candidates(config: &ProxyConfig) -> Vec<ProxyCandidate> {
    let mut candidates: Vec<ProxyCandidate> = Vec::new();
    let mut add = |template: &str, label: &'static str, api_key: Option<String>| {
        let template = template.trim();
        if template.is_empty() || candidates.iter().any(|c| c.template == template) {
            return;
        }
        candidates.push(ProxyCandidate {
            template: template.to_string(),
            label,
            api_key,
        });
    };

    if let Some(custom) = config.proxy_url.as_deref() {
        add(custom, "Custom proxy", None);
    }
    add(DEFAULT_PROXY_URL, "CORSProxy.io", None);
    add(ALLORIGINS_PROXY_URL, "AllOrigins (backup)", None);
    if let Some(key) = config.api_key() {
        add(CORS_SH_PROXY_URL, "proxy.cors.sh", Some(key.to_string()));
    }

    candidates
}

#[derive(Debug, Clone, Default)]
pub struct PdfFetcher {
    client: reqwest::Client,
}

impl PdfFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads `url` through the configured proxies.
    pub async fn fetch_pdf(&self, url: &str, config: &ProxyConfig) -> Result<PdfDocument, FetchError> {
        self.fetch_pdf_via(url, &proxy_candidates(config)).await
    }

    /// Tries each candidate once, in order. The first non-empty 2xx body wins.
    pub async fn fetch_pdf_via(
        &self,
        url: &str,
        candidates: &[ProxyCandidate],
    ) -> Result<PdfDocument, FetchError> {
        let mut errors = Vec::new();

        for candidate in candidates {
            let proxied = build_proxied_url(&candidate.template, url);
            debug!(proxy = candidate.label, url = %proxied, "fetching pdf");

            match self.try_candidate(&proxied, candidate).await {
                Ok(bytes) => {
                    return Ok(PdfDocument {
                        file_name: REMOTE_FILE_NAME.to_string(),
                        bytes,
                    })
                }
                Err(reason) => {
                    warn!(proxy = candidate.label, reason = %reason, "proxy failed");
                    errors.push(format!("{}: {}", candidate.label, reason));
                }
            }
        }

        Err(FetchError::AllProxiesFailed(errors))
    }

    async fn try_candidate(&self, proxied: &str, candidate: &ProxyCandidate) -> Result<Vec<u8>, String> {
        let mut request = self.client.get(proxied);
        if let Some(key) = &candidate.api_key {
            request = request.header(CORS_SH_KEY_HEADER, key.as_str());
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(status.to_string());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or_default().trim().to_lowercase());

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        if bytes.is_empty() {
            return Err("received empty response".to_string());
        }

        // Proxies answer block and captcha pages with 200.
        let typed_pdf = content_type.as_deref() == Some(PDF_MIME_TYPE);
        if !typed_pdf && !bytes.starts_with(PDF_SIGNATURE) {
            return Err(format!(
                "returned {}",
                content_type.unwrap_or_else(|| "non-PDF content".to_string())
            ));
        }
        Ok(bytes.to_vec())
    }
}

/// Reads a local PDF, rejecting files without the `%PDF` signature.
pub fn load_pdf_file(path: &Path) -> Result<PdfDocument, FetchError> {
    let bytes = std::fs::read(path).map_err(|e| FetchError::Read(path.to_path_buf(), e))?;
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(FetchError::NotPdf(path.to_path_buf()));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "meet.pdf".to_string());
    Ok(PdfDocument { file_name, bytes })
}
