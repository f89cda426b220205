//! Layered server configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults (every field has one)
//! 2. An optional file: the path in `TWINFORGE_CONFIG`, otherwise
//!    `twinforge.yaml` / `twinforge.toml` in the working directory
//! 3. Environment variables prefixed `TWINFORGE__`, with `__` between
//!    nesting levels (e.g. `TWINFORGE__SERVER__PORT=9000`)
//!
//! `GEMINI_API_KEY` fills `generation.api_key` when nothing else set it.

use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use twinforge_api::{ApiSettings, DEFAULT_MAX_UPLOAD_BYTES, ServerConfig};
use twinforge_genai::GenerationConfig;
use twinforge_types::{DeviceId, UserId};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "TWINFORGE_CONFIG";

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Base name of the config file looked up in the working directory.
const DEFAULT_CONFIG_NAME: &str = "twinforge";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listen address.
    pub server: ServerConfig,
    /// Entity store bootstrap.
    pub store: StoreConfig,
    /// Realtime ticker.
    pub realtime: RealtimeConfig,
    /// Upload limits.
    pub upload: UploadConfig,
    /// Generation adapter.
    pub generation: GenerationConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Entity store bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Load the sample user, twins, devices, templates and projects.
    pub seed_sample_data: bool,
    /// Owner used for dashboard listings and generated twins.
    pub default_user_id: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            default_user_id: 1,
        }
    }
}

/// Synthetic reading broadcast settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Seconds between readings.
    pub interval_secs: u64,
    /// Devices readings are attributed to.
    pub device_ids: Vec<u64>,
    /// Lower bound of reading values.
    pub value_min: f64,
    /// Upper bound (exclusive) of reading values.
    pub value_max: f64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            device_ids: vec![1, 2, 3, 4],
            value_min: 0.0,
            value_max: 100.0,
        }
    }
}

impl RealtimeConfig {
    /// Tick period.
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Typed device ids.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.device_ids.iter().copied().map(DeviceId::new).collect()
    }
}

/// Upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted upload body in bytes.
    pub max_file_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: String::from("info"),
        }
    }
}

impl AppConfig {
    /// Load configuration from the file and environment layers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if an explicitly named file is
    /// missing or any source is malformed, and [`ConfigError::Invalid`]
    /// if a value is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => File::with_name(&path).required(true),
            Err(_) => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("TWINFORGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("realtime.device_ids"),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.fill_api_key(std::env::var(API_KEY_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML document, without environment
    /// layers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document is malformed or a value is
    /// unusable.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Use `key` as the generation API key if none is configured.
    pub fn fill_api_key(&mut self, key: Option<String>) {
        if self.generation.api_key.is_empty()
            && let Some(key) = key.filter(|k| !k.is_empty())
        {
            self.generation.api_key = key;
        }
    }

    /// Settings handed to the HTTP layer.
    pub const fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            default_user_id: UserId::new(self.store.default_user_id),
            max_upload_bytes: self.upload.max_file_bytes,
        }
    }

    /// Reject values that would only fail later at runtime.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.max_file_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "upload.max_file_bytes",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.realtime.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "realtime.interval_secs",
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use twinforge_genai::BackendType;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_yaml("{}").ok();
        assert_eq!(config, Some(AppConfig::default()));

        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert!(config.store.seed_sample_data);
        assert_eq!(config.realtime.interval(), Duration::from_secs(5));
        assert_eq!(config.realtime.device_ids().len(), 4);
        assert_eq!(config.upload.max_file_bytes, 52_428_800);
    }

    #[test]
    fn yaml_overrides_nested_values() {
        let yaml = "
server:
  port: 8080
store:
  seed_sample_data: false
realtime:
  interval_secs: 2
  device_ids: [7, 8]
generation:
  backend: ollama
  api_url: http://localhost:11434/v1
logging:
  json: true
";
        let config = AppConfig::from_yaml(yaml).ok();
        assert!(config.is_some());
        let Some(config) = config else { return };

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.store.seed_sample_data);
        assert_eq!(
            config.realtime.device_ids(),
            vec![DeviceId::new(7), DeviceId::new(8)]
        );
        assert_eq!(config.generation.backend, BackendType::OpenAi);
        assert_eq!(config.generation.fast_model, "gemini-2.5-flash");
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_values_are_rejected() {
        assert!(matches!(
            AppConfig::from_yaml("realtime:\n  interval_secs: 0\n"),
            Err(ConfigError::Invalid {
                key: "realtime.interval_secs",
                ..
            })
        ));
        assert!(matches!(
            AppConfig::from_yaml("upload:\n  max_file_bytes: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn api_key_fallback_only_fills_blank() {
        let mut config = AppConfig::default();
        config.fill_api_key(Some("from-env".to_owned()));
        assert_eq!(config.generation.api_key, "from-env");

        config.fill_api_key(Some("other".to_owned()));
        assert_eq!(config.generation.api_key, "from-env");

        let mut config = AppConfig::default();
        config.fill_api_key(Some(String::new()));
        assert!(config.generation.api_key.is_empty());
    }

    #[test]
    fn api_settings_carry_store_and_upload_values() {
        let config = AppConfig {
            store: StoreConfig {
                default_user_id: 42,
                ..StoreConfig::default()
            },
            upload: UploadConfig { max_file_bytes: 10 },
            ..AppConfig::default()
        };
        let settings = config.api_settings();
        assert_eq!(settings.default_user_id, UserId::new(42));
        assert_eq!(settings.max_upload_bytes, 10);
    }
}
