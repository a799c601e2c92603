//! Prediction pipeline: normalize, invoke, format

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::domain::inference::{
    format_prediction, Classifier, ImageNormalizer, InputShape, LabelSet, PredictionError,
    PredictionResult,
};
use crate::domain::{AccountId, DomainError};
use crate::infrastructure::observability::record_prediction;

use super::invoker::InferenceInvoker;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the shared classifier and runs one upload through the whole pipeline
pub struct PredictionService {
    normalizer: Arc<dyn ImageNormalizer>,
    invoker: InferenceInvoker,
    labels: LabelSet,
    contract_version: String,
    timeout: Duration,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("input_shape", &self.invoker.input_shape())
            .field("labels", &self.labels.len())
            .field("contract_version", &self.contract_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PredictionService {
    /// Wire the pipeline, refusing combinations that could never produce a correct answer
    pub fn new(
        normalizer: Arc<dyn ImageNormalizer>,
        classifier: Arc<dyn Classifier>,
        labels: LabelSet,
    ) -> Result<Self, DomainError> {
        labels.ensure_matches_width(classifier.output_width())?;

        let produced = normalizer.target_shape();
        let expected = classifier.input_shape();

        if produced != expected {
            return Err(DomainError::configuration(format!(
                "Preprocessing produces {} but the classifier expects {}",
                produced, expected
            )));
        }

        Ok(Self {
            normalizer,
            invoker: InferenceInvoker::new(classifier),
            labels,
            contract_version: String::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_contract_version(mut self, version: impl Into<String>) -> Self {
        self.contract_version = version.into();
        self
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn contract_version(&self) -> &str {
        &self.contract_version
    }

    pub fn input_shape(&self) -> InputShape {
        self.invoker.input_shape()
    }

    /// Run the pipeline on the calling thread
    pub fn classify(&self, bytes: &[u8]) -> Result<PredictionResult, PredictionError> {
        let image = self.normalizer.normalize(bytes)?;
        let scores = self.invoker.invoke(&image)?;
        format_prediction(&scores, &self.labels)
    }

    /// Run the pipeline on the blocking pool, bounded by the configured timeout
    pub async fn predict(
        self: Arc<Self>,
        account_id: AccountId,
        bytes: Bytes,
    ) -> Result<PredictionResult, PredictionError> {
        let started = Instant::now();
        let timeout = self.timeout;
        let service = Arc::clone(&self);

        let task = tokio::task::spawn_blocking(move || service.classify(&bytes));

        let result = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(PredictionError::inference(format!(
                "Inference task failed: {}",
                join_error
            ))),
            Err(_) => Err(PredictionError::TimedOut(timeout)),
        };

        let elapsed = started.elapsed();

        match &result {
            Ok(prediction) => {
                record_prediction("success", Some(&prediction.label), elapsed);
                info!(
                    account_id = %account_id,
                    label = %prediction.label,
                    confidence = %prediction.confidence,
                    duration_ms = elapsed.as_millis() as u64,
                    "Prediction completed"
                );
            }
            Err(e) => {
                record_prediction(e.kind(), None, elapsed);
                match e {
                    PredictionError::Decode(_) => {
                        info!(account_id = %account_id, error = %e, "Rejected undecodable upload")
                    }
                    PredictionError::TimedOut(_) => {
                        warn!(account_id = %account_id, error = %e, "Prediction timed out")
                    }
                    PredictionError::ShapeMismatch { .. } | PredictionError::Configuration(_) => {
                        error!(
                            account_id = %account_id,
                            contract = %self.contract_version,
                            error = %e,
                            "Preprocessing and classifier disagree; check the deployed model"
                        )
                    }
                    PredictionError::Inference(_) => {
                        error!(account_id = %account_id, error = %e, "Prediction failed")
                    }
                }
            }
        }

        result
    }
}
