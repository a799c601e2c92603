//! Fruit Classifier
//!
//! An authenticated image classification service:
//! - Account registration and login with server-side sessions
//! - A session gate in front of the prediction endpoint
//! - Contract-driven image normalization feeding a pretrained ONNX classifier
//! - A small fruit catalog, optionally backed by PostgreSQL

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AccountServiceTrait, AppState};
use api::RouterOptions;
use domain::catalog::CatalogRepository;
use domain::inference::{Classifier, LabelSet};
use domain::DomainError;
use infrastructure::{
    account::{AccountService, Argon2Hasher, InMemoryAccountRepository, PostgresAccountRepository},
    catalog::{InMemoryCatalogRepository, PostgresCatalogRepository},
    inference::{ContractNormalizer, PredictionService, SerializedClassifier, TractClassifier},
    migrations::{schema_migrations, PostgresMigrator},
    observability::PrometheusMetrics,
    session::InMemorySessionStore,
    upload::DiskUploadSink,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Load the classifier and wire the prediction pipeline.
///
/// Fails when the model cannot be loaded or when the label set or the
/// preprocessing contract disagree with what the model declares.
pub fn build_prediction_service(config: &AppConfig) -> Result<PredictionService, DomainError> {
    let contract = config.classifier.contract.clone();
    let normalizer = ContractNormalizer::new(contract.clone())?;
    let labels = LabelSet::new(config.classifier.labels.clone())?;

    let tract = TractClassifier::load(&config.classifier.model_path, contract.input_shape())?;
    let classifier: Arc<dyn Classifier> = if config.inference.serialize_evaluations {
        info!("Classifier evaluations are serialized");
        Arc::new(SerializedClassifier::new(Arc::new(tract)))
    } else {
        Arc::new(tract)
    };

    let service = PredictionService::new(Arc::new(normalizer), classifier, labels)?
        .with_timeout(config.inference.timeout())
        .with_contract_version(contract.version);

    info!(
        contract = %service.contract_version(),
        input = %service.input_shape(),
        labels = service.labels().len(),
        "Prediction pipeline ready"
    );

    Ok(service)
}

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    // Classifier first: a bad model must stop startup before any I/O
    let prediction_service = Arc::new(build_prediction_service(config)?);

    let (account_service, catalog): (Arc<dyn AccountServiceTrait>, Arc<dyn CatalogRepository>) =
        match &config.storage.database_url {
            Some(database_url) => {
                info!("Connecting to PostgreSQL...");
                let pool = PgPoolOptions::new()
                    .max_connections(config.storage.max_connections)
                    .connect(database_url)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
                info!("PostgreSQL connection established");

                PostgresMigrator::new(pool.clone())
                    .run(&schema_migrations())
                    .await?;

                (
                    Arc::new(AccountService::new(
                        Arc::new(PostgresAccountRepository::new(pool.clone())),
                        Arc::new(Argon2Hasher::new()),
                    )),
                    Arc::new(PostgresCatalogRepository::new(pool)),
                )
            }
            None => {
                info!("Using in-memory account and catalog storage");
                (
                    Arc::new(AccountService::new(
                        Arc::new(InMemoryAccountRepository::new()),
                        Arc::new(Argon2Hasher::new()),
                    )),
                    Arc::new(InMemoryCatalogRepository::default()),
                )
            }
        };

    let session_store = Arc::new(InMemorySessionStore::with_config(
        config.session.store_config(),
    ));

    let mut state = AppState::new(
        account_service,
        session_store,
        catalog,
        prediction_service,
        config.session.clone(),
    );

    if config.uploads.enabled {
        let sink = DiskUploadSink::new(&config.uploads.directory);
        sink.ensure_directory().await?;
        info!(directory = %config.uploads.directory.display(), "Upload persistence enabled");
        state = state.with_upload_sink(Arc::new(sink));
    }

    Ok(state)
}

/// Router options derived from configuration
pub fn router_options(config: &AppConfig, metrics: Option<PrometheusMetrics>) -> RouterOptions {
    RouterOptions {
        max_upload_bytes: config.uploads.max_bytes,
        uploads_dir: config
            .uploads
            .enabled
            .then(|| config.uploads.directory.clone()),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_fails_startup() {
        let mut config = AppConfig::default();
        config.classifier.model_path = "/nonexistent/model.onnx".into();

        let err = build_prediction_service(&config).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_labels_fail_before_loading_the_model() {
        let mut config = AppConfig::default();
        config.classifier.labels = vec!["apple".to_string(), "apple".to_string()];

        let err = build_prediction_service(&config).unwrap_err();
        assert!(!err.to_string().contains("Model"));
    }

    #[test]
    fn test_router_options_follow_upload_config() {
        let mut config = AppConfig::default();
        config.uploads.max_bytes = 1024;

        let options = router_options(&config, None);
        assert_eq!(options.max_upload_bytes, 1024);
        assert!(options.uploads_dir.is_some());

        config.uploads.enabled = false;
        assert!(router_options(&config, None).uploads_dir.is_none());
    }
}
