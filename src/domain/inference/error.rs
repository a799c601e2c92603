use std::time::Duration;

use thiserror::Error;

/// Failures of the inference pipeline for a single request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    /// The upload is not a readable image
    #[error("Unable to decode image: {0}")]
    Decode(String),

    /// Normalized tensor does not fit the classifier input; a preprocessing/model mismatch
    #[error("Input shape mismatch: classifier expects {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// The classifier runtime failed
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Inference timed out after {0:?}")]
    TimedOut(Duration),

    /// A startup invariant turned out not to hold
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PredictionError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Short label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::Inference(_) => "inference_error",
            Self::TimedOut(_) => "timeout",
            Self::Configuration(_) => "configuration_error",
        }
    }

    /// Whether the fault lies with the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_decode_errors_blame_the_client() {
        assert!(PredictionError::decode("truncated").is_client_error());
        assert!(!PredictionError::inference("oom").is_client_error());
        assert!(!PredictionError::TimedOut(Duration::from_secs(30)).is_client_error());
    }

    #[test]
    fn test_kind_labels() {
        let mismatch = PredictionError::ShapeMismatch {
            expected: "1x224x224x3 (nhwc)".to_string(),
            actual: "1x3x224x224 (nchw)".to_string(),
        };

        assert_eq!(mismatch.kind(), "shape_mismatch");
        assert_eq!(PredictionError::decode("x").kind(), "decode_error");
        assert!(mismatch.to_string().contains("1x3x224x224"));
    }
}
