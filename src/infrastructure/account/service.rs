//! Account service for registration and credential verification

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::account::{
    normalize_email, validate_email, validate_password, validate_username, Account, AccountId,
    AccountRepository, NewAccount,
};
use crate::domain::DomainError;

use super::password::{PasswordHasher, UNKNOWN_ACCOUNT_HASH};

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account service backed by a credential store and a password hasher
#[derive(Debug)]
pub struct AccountService<R: AccountRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: AccountRepository, H: PasswordHasher> AccountService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account
    pub async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(&request.email);

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let account = self
            .repository
            .insert(NewAccount {
                username: request.username,
                email,
                password_hash,
            })
            .await?;

        info!(account_id = %account.id(), "Account registered");

        Ok(account)
    }

    /// Verify credentials; `None` covers both unknown email and wrong password
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let email = normalize_email(email);

        let Some(account) = self.repository.get_by_email(&email).await? else {
            self.hasher.verify(password, UNKNOWN_ACCOUNT_HASH);
            debug!("Login rejected: unknown email");
            return Ok(None);
        };

        if !self.hasher.verify(password, account.password_hash()) {
            debug!(account_id = %account.id(), "Login rejected: password mismatch");
            return Ok(None);
        }

        Ok(Some(account))
    }

    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        self.repository.get(id).await
    }
}
