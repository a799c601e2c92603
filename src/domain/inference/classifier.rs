//! Classifier and normalizer seams

#[cfg(test)]
use mockall::automock;

use super::error::PredictionError;
use super::tensor::{InputShape, NormalizedImage};

/// Pretrained classifier, shared read-only across requests
#[cfg_attr(test, automock)]
pub trait Classifier: Send + Sync {
    /// Input shape the model declares
    fn input_shape(&self) -> InputShape;

    /// Number of scores produced per image
    fn output_width(&self) -> usize;

    /// Evaluate one image and return its score vector
    fn evaluate(&self, input: &NormalizedImage) -> Result<Vec<f32>, PredictionError>;
}

/// Converts raw upload bytes into classifier input
#[cfg_attr(test, automock)]
pub trait ImageNormalizer: Send + Sync {
    /// Shape of every tensor this normalizer produces
    fn target_shape(&self) -> InputShape;

    fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, PredictionError>;
}
