//! PostgreSQL catalog reading the `fruits` table

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::catalog::{CatalogRepository, Fruit};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Fruit>, DomainError> {
        let rows = sqlx::query("SELECT fruit_id, name, description FROM fruits ORDER BY fruit_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list fruits: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<Fruit, sqlx::Error> {
                Ok(Fruit {
                    id: row.try_get("fruit_id")?,
                    name: row.try_get("name")?,
                    description: row
                        .try_get::<Option<String>, _>("description")?
                        .unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::storage(format!("Failed to read fruit row: {}", e)))
    }
}
