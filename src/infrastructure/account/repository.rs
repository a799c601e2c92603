//! In-memory credential store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository, NewAccount};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<AccountId, Account>,
    /// Canonical email -> account ID
    email_index: HashMap<String, AccountId>,
    next_id: i64,
}

/// In-memory implementation of AccountRepository
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<Accounts>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_id.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;

        Ok(accounts
            .email_index
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.email_index.contains_key(&account.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                account.email
            )));
        }

        accounts.next_id += 1;
        let id = AccountId::new(accounts.next_id);
        let account = account.into_account(id);

        accounts.email_index.insert(account.email().to_string(), id);
        accounts.by_id.insert(id, account.clone());

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryAccountRepository::new();

        let first = repo.insert(new_account("alice", "alice@example.com")).await.unwrap();
        let second = repo.insert(new_account("bob", "bob@example.com")).await.unwrap();

        assert_eq!(first.id(), AccountId::new(1));
        assert_eq!(second.id(), AccountId::new(2));
    }

    #[tokio::test]
    async fn test_lookup_by_email_and_id() {
        let repo = InMemoryAccountRepository::new();
        let account = repo.insert(new_account("alice", "alice@example.com")).await.unwrap();

        let by_email = repo.get_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id(), account.id());

        let by_id = repo.get(account.id()).await.unwrap().unwrap();
        assert_eq!(by_id.username(), "alice");

        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(repo.get(AccountId::new(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(new_account("alice", "alice@example.com")).await.unwrap();

        let err = repo
            .insert(new_account("alice2", "alice@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert!(repo.email_exists("alice@example.com").await.unwrap());
    }
}
