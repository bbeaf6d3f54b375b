use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};
use swim_meet_core::{FileSettingsStore, SettingKey, SettingsStore};

use super::OutputFormat;
use crate::config::{Config, ConfigSource};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Store a setting in the config file
    Set {
        /// Setting name, e.g. github.owner
        key: SettingKey,

        /// New value
        value: String,
    },

    /// Remove a setting from the config file
    Unset {
        /// Setting name, e.g. github.owner
        key: SettingKey,
    },

    /// Print the config file path
    Path,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        let mut values = Map::new();
                        for (key, value) in &config.values {
                            values.insert(
                                key.as_str().to_string(),
                                json!({
                                    "value": display_value(*key, value.value.as_deref()),
                                    "source": value.source,
                                }),
                            );
                        }
                        values.insert(
                            "data_dir".to_string(),
                            json!({
                                "value": config.data_dir.value,
                                "source": config.data_dir.source,
                            }),
                        );
                        let output = json!({
                            "config_file": config.config_file,
                            "values": Value::Object(values),
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!("Config file: {} (not found)", config.config_path.display());
                        }

                        for (key, value) in &config.values {
                            if *key == SettingKey::DataDir {
                                continue;
                            }
                            println!();
                            println!(
                                "{}: {}",
                                key,
                                display_value(*key, value.value.as_deref())
                                    .unwrap_or_else(|| "(not set)".to_string())
                            );
                            println!("  source: {}", value.source);
                        }

                        println!();
                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Set { key, value } => {
                key.validate(value)?;
                let mut store = FileSettingsStore::open(&config.config_path)?;
                store.set(key.as_str(), value)?;

                println!("Set {} in {}", key, config.config_path.display());
                warn_if_overridden(config, *key);
                Ok(())
            }

            ConfigSubcommand::Unset { key } => {
                let mut store = FileSettingsStore::open(&config.config_path)?;
                store.remove(key.as_str())?;

                println!("Unset {} in {}", key, config.config_path.display());
                warn_if_overridden(config, *key);
                Ok(())
            }

            ConfigSubcommand::Path => {
                println!("{}", config.config_path.display());
                Ok(())
            }
        }
    }
}

fn warn_if_overridden(config: &Config, key: SettingKey) {
    let overridden = config
        .value(key)
        .is_some_and(|value| value.source == ConfigSource::Environment);
    if let (true, Some(var)) = (overridden, key.env_var()) {
        println!("Note: {} is currently overridden by {}", key, var);
    }
}

/// Value as shown to the user; secrets keep only their last four characters.
fn display_value(key: SettingKey, value: Option<&str>) -> Option<String> {
    let value = value?;
    if !key.is_secret() {
        return Some(value.to_string());
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return Some("****".to_string());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    Some(format!("****{}", tail))
}
