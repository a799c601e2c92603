//! PostgreSQL schema bootstrap for the account and catalog tables

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;
use crate::infrastructure::catalog::default_fruits;

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// Applies pending migrations, recording each in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run(&self, migrations: &[Migration]) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        for migration in migrations {
            self.run_migration(migration).await?;
        }

        Ok(())
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open transaction: {}", e)))?;

        sqlx::raw_sql(&migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(version = migration.version, description = %migration.description, "Migration applied");

        Ok(())
    }
}

pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id SERIAL PRIMARY KEY,
                username VARCHAR(50) NOT NULL,
                email VARCHAR(254) NOT NULL,
                password TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx ON users (lower(email));
            "#,
        ),
        Migration::new(
            2,
            "Create fruits table",
            r#"
            CREATE TABLE IF NOT EXISTS fruits (
                fruit_id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                description TEXT
            );
            "#,
        ),
        Migration::new(3, "Seed fruit catalog", seed_fruits_sql()),
    ]
}

fn seed_fruits_sql() -> String {
    let rows: Vec<String> = default_fruits()
        .iter()
        .map(|fruit| {
            format!(
                "({}, '{}', '{}')",
                fruit.id,
                fruit.name.replace('\'', "''"),
                fruit.description.replace('\'', "''")
            )
        })
        .collect();

    format!(
        "INSERT INTO fruits (fruit_id, name, description) VALUES {} ON CONFLICT (fruit_id) DO NOTHING; \
         SELECT setval(pg_get_serial_sequence('fruits', 'fruit_id'), (SELECT MAX(fruit_id) FROM fruits));",
        rows.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_strictly_increasing() {
        let migrations = schema_migrations();

        assert!(migrations
            .windows(2)
            .all(|pair| pair[0].version < pair[1].version));
    }

    #[test]
    fn test_seed_covers_the_default_catalog() {
        let sql = seed_fruits_sql();

        for fruit in default_fruits() {
            assert!(sql.contains(&format!("'{}'", fruit.name)));
        }
        assert!(sql.contains("ON CONFLICT (fruit_id) DO NOTHING"));
    }
}
