//! PostgreSQL credential store
//!
//! Expects the existing `users` table:
//!
//! ```sql
//! CREATE TABLE users (
//!     user_id  SERIAL PRIMARY KEY,
//!     username TEXT NOT NULL,
//!     email    TEXT NOT NULL UNIQUE,
//!     password TEXT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::account::{Account, AccountId, AccountRepository, NewAccount};
use crate::domain::DomainError;

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, username, email, password
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, username, email, password
            FROM users
            WHERE lower(email) = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account by email: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING user_id
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Email '{}' is already registered", account.email))
            } else {
                DomainError::storage(format!("Failed to create account: {}", e))
            }
        })?;

        let id: i32 = row
            .try_get("user_id")
            .map_err(|e| DomainError::storage(format!("Failed to read user_id: {}", e)))?;

        Ok(account.into_account(AccountId::new(i64::from(id))))
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let read_err = |e: sqlx::Error| DomainError::storage(format!("Failed to read account row: {}", e));

    let id: i32 = row.try_get("user_id").map_err(read_err)?;
    let username: String = row.try_get("username").map_err(read_err)?;
    let email: String = row.try_get("email").map_err(read_err)?;
    let password_hash: String = row.try_get("password").map_err(read_err)?;

    Ok(Account::new(
        AccountId::new(i64::from(id)),
        username,
        email,
        password_hash,
    ))
}
