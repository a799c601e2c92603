//! Account infrastructure module
//!
//! Credential store implementations (in-memory and PostgreSQL), Argon2
//! password hashing, and the account service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresAccountRepository;
pub use repository::InMemoryAccountRepository;
pub use service::{AccountService, RegisterAccountRequest};
