//! Catalog infrastructure

mod in_memory;
mod postgres_repository;

pub use in_memory::{default_fruits, InMemoryCatalogRepository};
pub use postgres_repository::PostgresCatalogRepository;
