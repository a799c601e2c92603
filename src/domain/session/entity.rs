//! Session entity and token types

use chrono::{DateTime, Duration, Utc};

use crate::domain::account::AccountId;

/// Opaque token handed to the client after login
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Server-side record of an authenticated client
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    account_id: AccountId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account_id: AccountId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            account_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Per-request authorization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No valid session was presented
    Anonymous,
    /// A valid session bound to an account
    Authenticated(AccountId),
}

impl AuthState {
    /// Build the state from a session lookup result
    pub fn from_lookup(account_id: Option<AccountId>) -> Self {
        match account_id {
            Some(id) => Self::Authenticated(id),
            None => Self::Anonymous,
        }
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Authenticated(id) => Some(*id),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(token.as_str(), "super-secret");
    }

    #[test]
    fn test_session_expiry() {
        let session = Session::new(AccountId::new(1), Duration::minutes(30));

        assert!(!session.is_expired_at(session.created_at()));
        assert!(session.is_expired_at(session.expires_at()));
        assert!(session.is_expired_at(session.created_at() + Duration::hours(1)));
    }

    #[test]
    fn test_auth_state_from_lookup() {
        let anonymous = AuthState::from_lookup(None);
        assert_eq!(anonymous, AuthState::Anonymous);
        assert!(!anonymous.is_authenticated());
        assert_eq!(anonymous.account_id(), None);

        let authenticated = AuthState::from_lookup(Some(AccountId::new(4)));
        assert!(authenticated.is_authenticated());
        assert_eq!(authenticated.account_id(), Some(AccountId::new(4)));
    }
}
