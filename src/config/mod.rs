//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ClassifierConfig, InferenceConfig, LogFormat, LoggingConfig, ServerConfig,
    SessionConfig, StorageConfig, UploadsConfig,
};
