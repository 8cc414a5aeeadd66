//! In-memory storage implementation for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::{CatalogStore, GiftCategory, NewProduct, StoredProduct};

/// In-memory catalog store.
///
/// Useful for testing and development. Not suitable for production as data
/// is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    categories: RwLock<HashMap<Uuid, GiftCategory>>,
    products: RwLock<Vec<StoredProduct>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category, returning its id.
    pub fn insert_category(&self, owner_id: Uuid, description: impl Into<String>) -> Uuid {
        let category = GiftCategory {
            id: Uuid::now_v7(),
            owner_id,
            description: description.into(),
        };
        let id = category.id;
        self.categories.write().unwrap().insert(id, category);
        id
    }

    /// All products persisted for a category.
    pub fn products_for_category(&self, category_id: Uuid) -> Vec<StoredProduct> {
        self.products
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect()
    }

    /// Total number of persisted products.
    pub fn product_count(&self) -> usize {
        self.products.read().unwrap().len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn fetch_category(
        &self,
        category_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<GiftCategory>> {
        Ok(self
            .categories
            .read()
            .unwrap()
            .get(&category_id)
            .filter(|c| c.owner_id == owner_id)
            .cloned())
    }

    async fn insert_products(
        &self,
        category_id: Uuid,
        products: Vec<NewProduct>,
    ) -> Result<Vec<StoredProduct>> {
        let now = Utc::now();
        let rows: Vec<StoredProduct> = products
            .into_iter()
            .map(|p| StoredProduct {
                id: Uuid::now_v7(),
                category_id,
                provider: p.provider,
                record: p.record,
                created_at: now,
            })
            .collect();

        self.products.write().unwrap().extend(rows.clone());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductRecord;

    #[tokio::test]
    async fn test_fetch_category_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        let other = Uuid::now_v7();
        let category_id = store.insert_category(owner, "fitness gear");

        assert!(store.fetch_category(category_id, owner).await.unwrap().is_some());
        assert!(store.fetch_category(category_id, other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_products_assigns_ids() {
        let store = MemoryStore::new();
        let category_id = store.insert_category(Uuid::now_v7(), "fitness gear");

        let inserted = store
            .insert_products(
                category_id,
                vec![NewProduct::new(
                    "rainforest",
                    ProductRecord::new("Fitbit Charge 6", "https://www.amazon.com/dp/B0CC6"),
                )],
            )
            .await
            .unwrap();

        assert_eq!(inserted.len(), 1);
        assert_eq!(store.products_for_category(category_id).len(), 1);
    }
}
