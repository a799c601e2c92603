use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::inference::{default_fruit_labels, PreprocessingContract};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::session::SessionStoreConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub classifier: ClassifierConfig,
    pub inference: InferenceConfig,
    pub uploads: UploadsConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Account and catalog persistence; in-memory stores when no URL is set
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_secs: u64,
    pub idle_secs: u64,
    pub max_sessions: u64,
    /// Mark the cookie `Secure`; enable when served over HTTPS
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    /// Class names in the order of the model's output vector
    pub labels: Vec<String>,
    pub contract: PreprocessingContract,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub timeout_secs: u64,
    /// Admit one evaluation at a time
    pub serialize_evaluations: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    pub enabled: bool,
    pub directory: PathBuf,
    pub max_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            ttl_secs: 24 * 60 * 60,
            idle_secs: 2 * 60 * 60,
            max_sessions: 100_000,
            secure_cookie: false,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            max_sessions: self.max_sessions,
            ttl: self.ttl(),
            time_to_idle: (self.idle_secs > 0).then(|| Duration::from_secs(self.idle_secs)),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/fruit_classifier.onnx"),
            labels: default_fruit_labels(),
            contract: PreprocessingContract::default(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            serialize_evaluations: false,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("uploads"),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("classifier.labels")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
