//! Inference infrastructure
//!
//! The contract-driven image normalizer, the tract ONNX classifier and the
//! prediction service that ties them to the label set.

mod invoker;
mod normalizer;
mod serialized;
mod service;
mod tract_classifier;

#[cfg(test)]
pub(crate) mod fixtures;

pub use invoker::InferenceInvoker;
pub use normalizer::ContractNormalizer;
pub use serialized::SerializedClassifier;
pub use service::PredictionService;
pub use tract_classifier::TractClassifier;
