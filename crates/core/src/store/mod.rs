//! Collaborator store interfaces the engine consumes. The engine treats
//! every read as a possibly-stale snapshot and never assumes referential
//! integrity of cached ids.

pub mod memory;

use async_trait::async_trait;

use crate::domain::product::{Product, ProductId};
use crate::errors::StoreError;

pub use memory::{MemoryCatalog, MemoryRecommendationCache};

/// Query shape for catalog listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Product to leave out (typically the recommendation target).
    pub exclude: Option<ProductId>,
    /// Case-insensitive category equality.
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// Order by `created_at` descending instead of catalog (id) order.
    pub newest_first: bool,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn excluding(mut self, id: ProductId) -> Self {
        self.exclude = Some(id);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured = Some(true);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }
}

/// Read access to the product catalog. Listing order must be stable for a
/// fixed catalog state: id order by default, recency order under
/// `newest_first` — the similarity ranker's tie-breaking depends on it.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    async fn list_products(&self, filter: &CatalogFilter) -> Result<Vec<Product>, StoreError>;
}

/// Memoized similarity output, keyed by source product id. One entry per
/// key; `put` is a last-writer-wins upsert.
#[async_trait]
pub trait RecommendationCache: Send + Sync {
    async fn get(&self, product_id: ProductId) -> Result<Option<Vec<ProductId>>, StoreError>;
    async fn put(&self, product_id: ProductId, recommended: &[ProductId])
        -> Result<(), StoreError>;
    /// Delete one entry, or every entry when `product_id` is `None`.
    async fn invalidate(&self, product_id: Option<ProductId>) -> Result<(), StoreError>;
}
