//! Persisted key-value settings and the typed view built from them.
//!
//! Values are plain strings under dotted keys (`github.owner`). Every key
//! is optional; [`Settings`] fills the gaps with defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::ErrorKind;
use crate::extract::GeminiModel;
use crate::pdf::ProxyConfig;
use crate::store::{StorageCredentials, DEFAULT_BRANCH, DEFAULT_FOLDER};

pub const DEFAULT_SHARE_BASE_URL: &str = "https://swim-meet.app/";
pub const DEFAULT_ACTIVE_TAB: &str = "generate";
pub const TABS: [&str; 3] = ["generate", "drafts", "shared"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{}': {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse settings file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, serde_yaml::Error),

    #[error("Failed to write settings file '{}': {}", .0.display(), .1)]
    Write(PathBuf, String),

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettingsError::Read(..) | SettingsError::Write(..) => ErrorKind::Configuration,
            SettingsError::Parse(..) => ErrorKind::Decode,
            SettingsError::UnknownKey(_) | SettingsError::InvalidValue { .. } => {
                ErrorKind::Validation
            }
        }
    }
}

/// Every recognised setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    GeminiApiKey,
    GeminiModel,
    PdfProxyUrl,
    PdfProxyApiKey,
    GithubOwner,
    GithubRepo,
    GithubBranch,
    GithubFolder,
    GithubToken,
    ShareBaseUrl,
    GoogleSheetUrl,
    ActiveTab,
    DataDir,
}

impl SettingKey {
    pub const ALL: [SettingKey; 13] = [
        SettingKey::GeminiApiKey,
        SettingKey::GeminiModel,
        SettingKey::PdfProxyUrl,
        SettingKey::PdfProxyApiKey,
        SettingKey::GithubOwner,
        SettingKey::GithubRepo,
        SettingKey::GithubBranch,
        SettingKey::GithubFolder,
        SettingKey::GithubToken,
        SettingKey::ShareBaseUrl,
        SettingKey::GoogleSheetUrl,
        SettingKey::ActiveTab,
        SettingKey::DataDir,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::GeminiApiKey => "gemini_api_key",
            SettingKey::GeminiModel => "gemini_model",
            SettingKey::PdfProxyUrl => "pdf_proxy_url",
            SettingKey::PdfProxyApiKey => "pdf_proxy_api_key",
            SettingKey::GithubOwner => "github.owner",
            SettingKey::GithubRepo => "github.repo",
            SettingKey::GithubBranch => "github.branch",
            SettingKey::GithubFolder => "github.folder",
            SettingKey::GithubToken => "github.token",
            SettingKey::ShareBaseUrl => "share_base_url",
            SettingKey::GoogleSheetUrl => "google_sheet_url",
            SettingKey::ActiveTab => "active_tab",
            SettingKey::DataDir => "data_dir",
        }
    }

    /// Value used when the setting is absent.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            SettingKey::GeminiModel => Some("gemini-2.5-flash"),
            SettingKey::GithubBranch => Some(DEFAULT_BRANCH),
            SettingKey::GithubFolder => Some(DEFAULT_FOLDER),
            SettingKey::ShareBaseUrl => Some(DEFAULT_SHARE_BASE_URL),
            SettingKey::ActiveTab => Some(DEFAULT_ACTIVE_TAB),
            _ => None,
        }
    }

    /// Environment variable overriding the stored value.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            SettingKey::GeminiApiKey => Some("MEET_GEMINI_API_KEY"),
            SettingKey::GeminiModel => Some("MEET_GEMINI_MODEL"),
            SettingKey::GithubToken => Some("MEET_GITHUB_TOKEN"),
            SettingKey::DataDir => Some("MEET_DATA_DIR"),
            _ => None,
        }
    }

    /// Secrets are masked when settings are displayed.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            SettingKey::GeminiApiKey | SettingKey::PdfProxyApiKey | SettingKey::GithubToken
        )
    }

    /// Checks a value before it is stored.
    pub fn validate(&self, value: &str) -> Result<(), SettingsError> {
        let invalid = |message: String| SettingsError::InvalidValue {
            key: self.as_str().to_string(),
            message,
        };
        match self {
            SettingKey::GeminiModel => value.parse::<GeminiModel>().map(|_| ()).map_err(invalid),
            SettingKey::ActiveTab if !TABS.contains(&value) => Err(invalid(format!(
                "expected one of {}",
                TABS.join(", ")
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// Key-value persistence for settings.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn remove(&mut self, key: &str) -> Result<(), SettingsError>;
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySettingsStore {
    values: BTreeMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        self.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Settings in a flat YAML map, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettingsStore {
    /// Opens `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| SettingsError::Read(path.clone(), e))?;
            parse_flat_yaml(&contents).map_err(|e| SettingsError::Parse(path.clone(), e))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let write_error = |e: String| SettingsError::Write(self.path.clone(), e);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        let yaml = serde_yaml::to_string(&self.values).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(&self.path, yaml).map_err(|e| write_error(e.to_string()))?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Reads a YAML mapping of scalars. Nested mappings are flattened into
/// dotted keys so a hand-written `github:` section also works.
fn parse_flat_yaml(contents: &str) -> Result<BTreeMap<String, String>, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
    let mut values = BTreeMap::new();
    flatten_yaml("", &value, &mut values);
    Ok(values)
}

fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    use serde_yaml::Value;

    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = scalar_to_string(key) else {
                    continue;
                };
                let full = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_yaml(&full, child, out);
            }
        }
        other => {
            if let Some(text) = scalar_to_string(other) {
                if !prefix.is_empty() {
                    out.insert(prefix.to_string(), text);
                }
            }
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Typed settings with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: GeminiModel,
    pub proxy: ProxyConfig,
    pub storage: StorageCredentials,
    pub share_base_url: String,
    pub google_sheet_url: Option<String>,
    pub active_tab: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: GeminiModel::default(),
            proxy: ProxyConfig::default(),
            storage: StorageCredentials::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            google_sheet_url: None,
            active_tab: DEFAULT_ACTIVE_TAB.to_string(),
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn from_store(store: &dyn SettingsStore) -> Result<Self, SettingsError> {
        let text = |key: SettingKey| -> Option<String> {
            store
                .get(key.as_str())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let with_default = |key: SettingKey| -> String {
            text(key)
                .or_else(|| key.default_value().map(str::to_string))
                .unwrap_or_default()
        };

        let gemini_model = match text(SettingKey::GeminiModel) {
            Some(model) => model.parse().map_err(|message| SettingsError::InvalidValue {
                key: SettingKey::GeminiModel.as_str().to_string(),
                message,
            })?,
            None => GeminiModel::default(),
        };

        Ok(Self {
            gemini_api_key: text(SettingKey::GeminiApiKey),
            gemini_model,
            proxy: ProxyConfig {
                proxy_url: text(SettingKey::PdfProxyUrl),
                api_key: text(SettingKey::PdfProxyApiKey),
            },
            storage: StorageCredentials {
                owner: with_default(SettingKey::GithubOwner),
                repo: with_default(SettingKey::GithubRepo),
                branch: with_default(SettingKey::GithubBranch),
                folder: with_default(SettingKey::GithubFolder),
                token: with_default(SettingKey::GithubToken),
            },
            share_base_url: with_default(SettingKey::ShareBaseUrl),
            google_sheet_url: text(SettingKey::GoogleSheetUrl),
            active_tab: with_default(SettingKey::ActiveTab),
            data_dir: text(SettingKey::DataDir).map(PathBuf::from),
        })
    }
}
