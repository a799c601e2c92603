//! Account entity and related types

use serde::{Deserialize, Serialize};

/// Account identifier assigned by the credential store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    username: String,
    /// Stored in canonical (trimmed, lowercase) form
    email: String,
    /// Argon2 PHC string - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
}

impl Account {
    pub fn new(
        id: AccountId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Account data ready to be inserted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn into_account(self, id: AccountId) -> Account {
        Account::new(id, self.username, self.email, self.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_accessors() {
        let account = Account::new(AccountId::new(3), "alice", "alice@example.com", "hash");

        assert_eq!(account.id(), AccountId::new(3));
        assert_eq!(account.username(), "alice");
        assert_eq!(account.email(), "alice@example.com");
        assert_eq!(account.password_hash(), "hash");
    }

    #[test]
    fn test_serialization_excludes_password_hash() {
        let account = Account::new(
            AccountId::new(1),
            "alice",
            "alice@example.com",
            "$argon2id$v=19$secret",
        );

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"id\":1"));
    }

    #[test]
    fn test_new_account_into_account() {
        let new_account = NewAccount {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password_hash: "hash".to_string(),
        };

        let account = new_account.into_account(AccountId::new(9));
        assert_eq!(account.id().value(), 9);
        assert_eq!(account.username(), "bob");
    }
}
