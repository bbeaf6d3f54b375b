use serde::Serialize;
use std::path::PathBuf;
use swim_meet_core::{
    FileSettingsStore, MemorySettingsStore, SettingKey, Settings, SettingsError, SettingsStore,
};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw value of every setting, in `SettingKey::ALL` order
    pub values: Vec<(SettingKey, ConfigValue<Option<String>>)>,
    /// Typed view of the merged values
    pub settings: Settings,
    /// Directory holding the published link history
    pub data_dir: ConfigValue<PathBuf>,
    /// Config file path used (if it exists)
    pub config_file: Option<PathBuf>,
    /// Config file path that `config set` writes to
    pub config_path: PathBuf,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or_else(Self::default_config_path);

        let file = if path.exists() {
            Some(FileSettingsStore::open(&path).map_err(ConfigError::Load)?)
        } else {
            None
        };

        let mut values = Vec::with_capacity(SettingKey::ALL.len());
        let mut merged = MemorySettingsStore::new();

        for key in SettingKey::ALL {
            let from_env = key
                .env_var()
                .and_then(|var| std::env::var(var).ok())
                .filter(|v| !v.trim().is_empty());
            let from_file = file.as_ref().and_then(|store| store.get(key.as_str()));

            let value = if let Some(v) = from_env {
                ConfigValue::new(Some(v), ConfigSource::Environment)
            } else if let Some(v) = from_file {
                ConfigValue::new(Some(v), ConfigSource::File)
            } else {
                ConfigValue::new(key.default_value().map(str::to_string), ConfigSource::Default)
            };

            if let Some(v) = &value.value {
                merged
                    .set(key.as_str(), v)
                    .map_err(ConfigError::Invalid)?;
            }
            values.push((key, value));
        }

        let settings = Settings::from_store(&merged).map_err(ConfigError::Invalid)?;

        let data_dir = match values
            .iter()
            .find(|(key, _)| *key == SettingKey::DataDir)
            .and_then(|(_, v)| v.value.as_ref().map(|dir| (dir, v.source.clone())))
        {
            Some((dir, source)) => ConfigValue::new(PathBuf::from(dir), source),
            None => ConfigValue::new(Self::default_data_dir(), ConfigSource::Default),
        };

        Ok(Self {
            values,
            settings,
            data_dir,
            config_file: file.map(|store| store.path().to_path_buf()),
            config_path: path,
        })
    }

    /// Value and source of one setting
    pub fn value(&self, key: SettingKey) -> Option<&ConfigValue<Option<String>>> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/swim-meet/
    /// - macOS: ~/Library/Application Support/swim-meet/
    /// - Windows: %APPDATA%/swim-meet/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swim-meet")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/swim-meet/
    /// - macOS: ~/Library/Application Support/swim-meet/
    /// - Windows: %APPDATA%/swim-meet/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swim-meet")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Load(SettingsError),
    Invalid(SettingsError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "{}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
