//! Account domain
//!
//! Domain types and traits for the credential store: account entities,
//! registration validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountId, NewAccount};
pub use repository::AccountRepository;
pub use validation::{
    normalize_email, validate_email, validate_password, validate_username,
    AccountValidationError,
};
