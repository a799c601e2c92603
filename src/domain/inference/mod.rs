//! Inference domain
//!
//! Types for the prediction pipeline: the preprocessing contract, the
//! normalized tensor, the classifier seam, the label set and the result
//! formatter.

mod classifier;
mod contract;
mod error;
mod label_set;
mod prediction;
mod tensor;

pub use classifier::{Classifier, ImageNormalizer};
pub use contract::{PreprocessingContract, ResizeFilter, TensorLayout, ValueScaling};
pub use error::PredictionError;
pub use label_set::{default_fruit_labels, LabelSet};
pub use prediction::{first_max, format_prediction, Confidence, PredictionResult};
pub use tensor::{InputShape, NormalizedImage};

#[cfg(test)]
pub use classifier::{MockClassifier, MockImageNormalizer};
