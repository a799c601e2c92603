//! In-memory session store using moka

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache as MokaCache;

use super::token::{token_digest, SessionTokenGenerator};
use crate::domain::account::AccountId;
use crate::domain::session::{Session, SessionStore, SessionToken};
use crate::domain::DomainError;

/// Configuration for the in-memory session store
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Maximum number of live sessions
    pub max_sessions: u64,
    /// Absolute session lifetime
    pub ttl: Duration,
    /// Sessions not used for this long are dropped
    pub time_to_idle: Option<Duration>,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100_000,
            ttl: Duration::from_secs(24 * 3600),
            time_to_idle: Some(Duration::from_secs(2 * 3600)),
        }
    }
}

/// Sessions keyed by token digest, expired by moka
pub struct InMemorySessionStore {
    sessions: MokaCache<String, Session>,
    generator: SessionTokenGenerator,
    ttl: chrono::Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_config(SessionStoreConfig::default())
    }

    pub fn with_config(config: SessionStoreConfig) -> Self {
        let mut builder = MokaCache::builder()
            .max_capacity(config.max_sessions)
            .time_to_live(config.ttl);

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        let ttl =
            chrono::Duration::from_std(config.ttl).unwrap_or_else(|_| chrono::Duration::weeks(52));

        Self {
            sessions: builder.build(),
            generator: SessionTokenGenerator::new(),
            ttl,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, account_id: AccountId) -> Result<SessionToken, DomainError> {
        let token = self.generator.generate();
        let session = Session::new(account_id, self.ttl);

        self.sessions
            .insert(token_digest(token.as_str()), session)
            .await;

        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<AccountId>, DomainError> {
        let key = token_digest(token);

        match self.sessions.get(&key).await {
            Some(session) if session.is_expired_at(Utc::now()) => {
                self.sessions.invalidate(&key).await;
                Ok(None)
            }
            Some(session) => Ok(Some(session.account_id())),
            None => Ok(None),
        }
    }

    async fn clear(&self, token: &str) -> Result<(), DomainError> {
        self.sessions.invalidate(&token_digest(token)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_resolve_clear() {
        let store = InMemorySessionStore::new();
        let account_id = AccountId::new(7);

        let token = store.create(account_id).await.unwrap();
        assert_eq!(
            store.resolve(token.as_str()).await.unwrap(),
            Some(account_id)
        );

        store.clear(token.as_str()).await.unwrap();
        assert_eq!(store.resolve(token.as_str()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let store = InMemorySessionStore::new();

        assert_eq!(store.resolve("forged-token").await.unwrap(), None);
        assert!(store.clear("forged-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = InMemorySessionStore::new();

        let alice = store.create(AccountId::new(1)).await.unwrap();
        let bob = store.create(AccountId::new(2)).await.unwrap();
        store.clear(alice.as_str()).await.unwrap();

        assert_eq!(store.resolve(alice.as_str()).await.unwrap(), None);
        assert_eq!(
            store.resolve(bob.as_str()).await.unwrap(),
            Some(AccountId::new(2))
        );
    }

    #[tokio::test]
    async fn test_sessions_expire() {
        let store = InMemorySessionStore::with_config(SessionStoreConfig {
            max_sessions: 10,
            ttl: Duration::from_millis(50),
            time_to_idle: None,
        });

        let token = store.create(AccountId::new(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(store.resolve(token.as_str()).await.unwrap(), None);
    }
}
