//! Credential store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountId, NewAccount};
use crate::domain::DomainError;

/// Repository trait for account storage
///
/// Email arguments are expected in canonical form (see `normalize_email`).
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Insert a new account, assigning its ID. Fails with `Conflict` on a duplicate email.
    async fn insert(&self, account: NewAccount) -> Result<Account, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
