use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::EndpointResolver;

/// Flat setting keys understood by [`Config::apply_settings`].
pub mod keys {
    pub const YOLO_API_KEY: &str = "VITE_YOLO_API_KEY";
    pub const YOLO_ENDPOINT: &str = "VITE_YOLO_ENDPOINT";
    pub const YOLO_BOUNDING_BOXES: &str = "VITE_BOUNDING_BOXES_ENDPOINT";
    pub const YOLO_ADD_TRAIN_IMAGE: &str = "VITE_YOLO_ADD_TRAIN_IMAGE";
    pub const YOLO_RETRAIN: &str = "VITE_YOLO_RETRAIN";

    pub const RETINANET_ENDPOINT: &str = "VITE_RETINANET_ENDPOINT";
    /// Never read for routing. Kept only so a stray value can be reported.
    pub const RETINANET_BOUNDING_BOXES_UNUSED: &str = "VITE_RETINANET_BOUNDING_BOXES_ENDPOINT";
    pub const RETINANET_BOUNDING_BOXES: &str = "VITE_BOUNDING_BOXES_RETINANET_ENDPOINT";
    pub const RETINANET_ADD_TRAIN_IMAGE: &str = "VITE_RETINANET_ADD_TRAIN_IMAGE";
    pub const RETINANET_RETRAIN: &str = "VITE_RETINANET_RETRAIN";

    pub const RLHF_BASE_ENDPOINT: &str = "VITE_RLHF_BASE_ENDPOINT";

    pub const ICONS_BACKEND_URL: &str = "ICONS_BACKEND_URL";
    pub const DETECT_BACKEND_URL: &str = "DETECT_BACKEND_URL";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {key}")]
    MissingSetting { key: &'static str },

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

/// Proxy server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backends: BackendsConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Upper bound for inbound request bodies (multipart uploads).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Fixed backend addresses, not selected by model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    #[serde(default = "default_icons_url")]
    pub icons_url: String,

    #[serde(default = "default_detect_url")]
    pub detect_url: String,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            icons_url: default_icons_url(),
            detect_url: default_detect_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Per-family backend settings. Every value is optional until validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub retrain: Option<String>,

    #[serde(default)]
    pub add_train_image: Option<String>,

    #[serde(default)]
    pub bounding_boxes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub yolo: ModelSettings,

    #[serde(default)]
    pub retinanet: ModelSettings,

    #[serde(default)]
    pub rlhf_base_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for the proxy's own crates when neither `--log-level` nor
    /// `RUST_LOG` says otherwise.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_port() -> u16 { 8046 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_max_body_bytes() -> usize { 100 * 1024 * 1024 }
fn default_icons_url() -> String { "http://localhost:3001/api/icons".to_string() }
fn default_detect_url() -> String { "http://127.0.0.1:8000/yolo/detect".to_string() }
fn default_connect_timeout() -> u64 { 10 }
fn default_request_timeout() -> u64 { 60 }
fn default_log_level() -> String { "info".to_string() }

/// Returns the trimmed value, or `None` when it is absent or blank.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// Overlay a flat `key -> value` mapping (usually the process environment).
    ///
    /// Empty values are treated as unset and never clear a value that is
    /// already present. Unknown keys are ignored.
    pub fn apply_settings<I, K, V>(&mut self, settings: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in settings {
            let value: String = value.into();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let value = value.to_string();
            let key = key.as_ref();

            let slot = match key {
                keys::YOLO_API_KEY => &mut self.models.yolo.api_key,
                keys::YOLO_ENDPOINT => &mut self.models.yolo.endpoint,
                keys::YOLO_BOUNDING_BOXES => &mut self.models.yolo.bounding_boxes,
                keys::YOLO_ADD_TRAIN_IMAGE => &mut self.models.yolo.add_train_image,
                keys::YOLO_RETRAIN => &mut self.models.yolo.retrain,
                keys::RETINANET_ENDPOINT => &mut self.models.retinanet.endpoint,
                keys::RETINANET_BOUNDING_BOXES => &mut self.models.retinanet.bounding_boxes,
                keys::RETINANET_ADD_TRAIN_IMAGE => &mut self.models.retinanet.add_train_image,
                keys::RETINANET_RETRAIN => &mut self.models.retinanet.retrain,
                keys::RLHF_BASE_ENDPOINT => &mut self.models.rlhf_base_endpoint,
                keys::RETINANET_BOUNDING_BOXES_UNUSED => {
                    tracing::warn!(
                        "{} is set but ignored; RetinaNet bounding boxes are read from {}",
                        keys::RETINANET_BOUNDING_BOXES_UNUSED,
                        keys::RETINANET_BOUNDING_BOXES
                    );
                    continue;
                }
                keys::ICONS_BACKEND_URL => {
                    self.backends.icons_url = value;
                    continue;
                }
                keys::DETECT_BACKEND_URL => {
                    self.backends.detect_url = value;
                    continue;
                }
                _ => continue,
            };
            *slot = Some(value);
        }
    }

    /// Overlay settings from the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped; none of
    /// the recognised keys can be spelled that way.
    pub fn apply_env(&mut self) {
        let vars = std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        });
        self.apply_settings(vars);
    }

    /// Reject incomplete configuration before any request is served.
    ///
    /// Returns the resolver built from the validated model settings.
    pub fn validate(&self) -> Result<EndpointResolver, ConfigError> {
        if self.backends.icons_url.trim().is_empty() {
            return Err(ConfigError::MissingSetting { key: keys::ICONS_BACKEND_URL });
        }
        if self.backends.detect_url.trim().is_empty() {
            return Err(ConfigError::MissingSetting { key: keys::DETECT_BACKEND_URL });
        }
        if self.timeouts.connect_timeout == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "timeouts.connect_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.timeouts.request_timeout == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "timeouts.request_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        EndpointResolver::from_config(&self.models)
    }

    /// Backend addresses with surrounding whitespace removed.
    pub fn trimmed_backends(&self) -> BackendsConfig {
        BackendsConfig {
            icons_url: self.backends.icons_url.trim().to_string(),
            detect_url: self.backends.detect_url.trim().to_string(),
        }
    }
}

/// Get default config file path
/// Uses ~/.config/detector-proxy/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("detector-proxy")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/detector-proxy/config.toml)
///
/// The process environment is overlaid on whichever file was used.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = load_config_file(path)?;
    config.apply_env();
    Ok(config)
}

fn load_config_file(path: Option<PathBuf>) -> anyhow::Result<Config> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok(config);
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    // Try current directory config.toml
    let local_config = PathBuf::from("config.toml");
    if local_config.exists() {
        match std::fs::read_to_string(&local_config) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from current directory {:?}", local_config);
                    return Ok(config);
                }
                Err(e) => {
                    tracing::error!("Failed to parse ./config.toml: {}. Falling back to default path.", e);
                }
            },
            Err(e) => {
                tracing::error!("Failed to read ./config.toml: {}. Falling back to default path.", e);
            }
        }
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let content = std::fs::read_to_string(&default_path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok(config)
    } else {
        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
pub(crate) fn complete_settings() -> Vec<(&'static str, &'static str)> {
    vec![
        (keys::YOLO_RETRAIN, "http://yolo.local/retrain"),
        (keys::YOLO_ADD_TRAIN_IMAGE, "http://yolo.local/add"),
        (keys::YOLO_BOUNDING_BOXES, "http://yolo.local/detect"),
        (keys::RETINANET_RETRAIN, "http://retina.local/retrain"),
        (keys::RETINANET_ADD_TRAIN_IMAGE, "http://retina.local/add"),
        (keys::RETINANET_BOUNDING_BOXES, "http://retina.local/boxes"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fill_model_sections() {
        let mut config = Config::default();
        config.apply_settings(complete_settings());

        assert_eq!(config.models.yolo.retrain.as_deref(), Some("http://yolo.local/retrain"));
        assert_eq!(config.models.yolo.bounding_boxes.as_deref(), Some("http://yolo.local/detect"));
        assert_eq!(
            config.models.retinanet.bounding_boxes.as_deref(),
            Some("http://retina.local/boxes")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_values_are_unset() {
        let mut config = Config::default();
        config.apply_settings(complete_settings());
        config.apply_settings([(keys::YOLO_RETRAIN, ""), (keys::ICONS_BACKEND_URL, "  ")]);

        assert_eq!(config.models.yolo.retrain.as_deref(), Some("http://yolo.local/retrain"));
        assert_eq!(config.backends.icons_url, default_icons_url());
    }

    #[test]
    fn backend_urls_are_trimmed() {
        let mut config = Config::default();
        config.apply_settings([
            (keys::ICONS_BACKEND_URL, "  http://icons.local/api/icons \n"),
            (keys::YOLO_RETRAIN, " http://yolo.local/retrain "),
        ]);

        assert_eq!(config.backends.icons_url, "http://icons.local/api/icons");
        assert_eq!(config.models.yolo.retrain.as_deref(), Some("http://yolo.local/retrain"));

        config.backends.detect_url = "\thttp://detector:8000/yolo/detect  ".to_string();
        assert_eq!(config.trimmed_backends().detect_url, "http://detector:8000/yolo/detect");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_environment_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("DETECTOR_PROXY_TEST_NON_UTF8", OsStr::from_bytes(&[0xff, 0xfe]));
        std::env::set_var(OsStr::from_bytes(&[b'X', 0xff]), "value");

        let mut config = Config::default();
        config.apply_env();

        std::env::remove_var("DETECTOR_PROXY_TEST_NON_UTF8");
        std::env::remove_var(OsStr::from_bytes(&[b'X', 0xff]));
        assert_eq!(config.backends.icons_url, default_icons_url());
    }

    #[test]
    fn unused_retinanet_key_is_ignored() {
        let mut config = Config::default();
        config.apply_settings([(keys::RETINANET_BOUNDING_BOXES_UNUSED, "http://wrong.local")]);

        assert!(config.models.retinanet.bounding_boxes.is_none());
    }

    #[test]
    fn missing_endpoint_fails_validation() {
        let mut config = Config::default();
        let settings: Vec<_> = complete_settings()
            .into_iter()
            .filter(|(key, _)| *key != keys::RETINANET_RETRAIN)
            .collect();
        config.apply_settings(settings);

        match config.validate() {
            Err(ConfigError::MissingSetting { key }) => assert_eq!(key, keys::RETINANET_RETRAIN),
            other => panic!("expected missing setting, got {:?}", other),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.apply_settings(complete_settings());
        config.timeouts.request_timeout = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { key: "timeouts.request_timeout", .. })
        ));
    }

    #[test]
    fn toml_sections_parse() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [backends]
            detect_url = "http://detector:8000/yolo/detect"

            [models.yolo]
            retrain = "http://yolo/retrain"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.backends.detect_url, "http://detector:8000/yolo/detect");
        assert_eq!(config.backends.icons_url, default_icons_url());
        assert_eq!(config.models.yolo.retrain.as_deref(), Some("http://yolo/retrain"));
        assert_eq!(config.timeouts.request_timeout, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn logging_level_parses() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
    }
}
