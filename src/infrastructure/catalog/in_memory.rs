//! In-memory catalog seeded with the fruits the model knows

use async_trait::async_trait;

use crate::domain::catalog::{CatalogRepository, Fruit};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct InMemoryCatalogRepository {
    fruits: Vec<Fruit>,
}

impl InMemoryCatalogRepository {
    pub fn with_fruits(mut fruits: Vec<Fruit>) -> Self {
        fruits.sort_by_key(|fruit| fruit.id);
        Self { fruits }
    }
}

impl Default for InMemoryCatalogRepository {
    fn default() -> Self {
        Self::with_fruits(default_fruits())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Fruit>, DomainError> {
        Ok(self.fruits.clone())
    }
}

pub fn default_fruits() -> Vec<Fruit> {
    vec![
        Fruit::new(1, "Apple", "Crisp pome fruit, red, green or yellow skinned."),
        Fruit::new(2, "Avocado", "Creamy green flesh around a single large seed."),
        Fruit::new(3, "Banana", "Elongated, soft and sweet with a yellow peel."),
        Fruit::new(4, "Cherry", "Small round stone fruit, usually deep red."),
        Fruit::new(5, "Kiwi", "Fuzzy brown skin with bright green flesh and black seeds."),
        Fruit::new(6, "Mango", "Juicy tropical stone fruit with orange flesh."),
        Fruit::new(7, "Orange", "Citrus fruit with a thick, segmented, juicy interior."),
        Fruit::new(8, "Pineapple", "Tropical fruit with spiky skin and tangy yellow flesh."),
        Fruit::new(9, "Strawberry", "Red berry with seeds on the outside."),
        Fruit::new(10, "Watermelon", "Large melon with green rind and red watery flesh."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_catalog_is_ordered_by_id() {
        let repo = InMemoryCatalogRepository::default();
        let fruits = repo.list_all().await.unwrap();

        assert_eq!(fruits.len(), 10);
        assert!(fruits.windows(2).all(|pair| pair[0].id < pair[1].id));
        assert_eq!(fruits[0].name, "Apple");
    }

    #[tokio::test]
    async fn test_custom_fruits_are_sorted() {
        let repo = InMemoryCatalogRepository::with_fruits(vec![
            Fruit::new(5, "Kiwi", ""),
            Fruit::new(2, "Avocado", ""),
        ]);

        let ids: Vec<i32> = repo.list_all().await.unwrap().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }
}
