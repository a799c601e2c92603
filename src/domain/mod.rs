//! Domain layer - Core business logic and entities

pub mod account;
pub mod catalog;
pub mod error;
pub mod inference;
pub mod session;
pub mod upload;

pub use account::{Account, AccountId, AccountRepository, NewAccount};
pub use catalog::{CatalogRepository, Fruit};
pub use error::DomainError;
pub use inference::{
    Classifier, Confidence, ImageNormalizer, InputShape, LabelSet, NormalizedImage,
    PredictionError, PredictionResult, PreprocessingContract,
};
pub use session::{AuthState, SessionStore, SessionToken};
pub use upload::{StoredUpload, UploadSink};
