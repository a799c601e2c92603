//! Session store trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::SessionToken;
use crate::domain::account::AccountId;
use crate::domain::DomainError;

/// Storage for server-tracked sessions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for an account and return the client token
    async fn create(&self, account_id: AccountId) -> Result<SessionToken, DomainError>;

    /// Resolve a client token to its account, `None` if unknown or expired
    async fn resolve(&self, token: &str) -> Result<Option<AccountId>, DomainError>;

    /// End the session behind a token; unknown tokens are ignored
    async fn clear(&self, token: &str) -> Result<(), DomainError>;
}
