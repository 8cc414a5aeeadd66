//! Persistence collaborator boundary.
//!
//! The pipeline treats the backing store as a row store accessed through
//! two calls: fetch the category a job references, and insert the products
//! it discovered. Everything else about persistence (schema, pooling,
//! migrations) lives on the far side of this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::types::ProductRecord;

/// A gift category owned by a user: the fuzzy description that seeds
/// discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftCategory {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub description: String,
}

/// Insert payload: a record plus the provider that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub provider: String,
    pub record: ProductRecord,
}

impl NewProduct {
    pub fn new(provider: impl Into<String>, record: ProductRecord) -> Self {
        Self {
            provider: provider.into(),
            record,
        }
    }
}

/// A persisted product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProduct {
    pub id: Uuid,
    pub category_id: Uuid,
    pub provider: String,
    pub record: ProductRecord,
    pub created_at: DateTime<Utc>,
}

/// Persistence collaborator.
///
/// `insert_products` is atomic at this boundary: on error, no subset of the
/// batch is silently persisted; the whole call surfaces as one failure.
///
/// # Implementations
///
/// - [`MemoryStore`](crate::stores::MemoryStore)
/// - [`MockCatalogStore`](crate::testing::MockCatalogStore)
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a category by id, scoped to its owner. `None` when missing or
    /// owned by someone else.
    async fn fetch_category(
        &self,
        category_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<GiftCategory>>;

    /// Insert a batch of discovered products for a category.
    async fn insert_products(
        &self,
        category_id: Uuid,
        products: Vec<NewProduct>,
    ) -> Result<Vec<StoredProduct>>;
}
