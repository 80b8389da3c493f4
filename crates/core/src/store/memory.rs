//! In-memory store implementations, used by engine tests and demos. The
//! interior locks only satisfy `&self` trait methods; the engine performs
//! no cross-call coordination (last writer wins, as with the SQL stores).

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use super::{CatalogFilter, CatalogStore, RecommendationCache};
use crate::domain::product::{Product, ProductId};
use crate::errors::StoreError;

/// Catalog backed by a `BTreeMap` keyed by id, so iteration order matches
/// the SQL store's id ordering.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<BTreeMap<i64, Product>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    pub fn upsert(&self, product: Product) {
        self.products
            .write()
            .expect("catalog lock poisoned")
            .insert(product.id.0, product);
    }

    pub fn remove(&self, id: ProductId) -> Option<Product> {
        self.products.write().expect("catalog lock poisoned").remove(&id.0)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().expect("catalog lock poisoned").get(&id.0).cloned())
    }

    async fn list_products(&self, filter: &CatalogFilter) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().expect("catalog lock poisoned");
        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| filter.exclude != Some(p.id))
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .map(|category| p.category_matches(category))
                    .unwrap_or(true)
            })
            .filter(|p| filter.featured.map(|featured| p.featured == featured).unwrap_or(true))
            .cloned()
            .collect();

        if filter.newest_first {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        }
        Ok(matched)
    }
}

#[derive(Debug, Default)]
pub struct MemoryRecommendationCache {
    entries: Mutex<HashMap<i64, Vec<ProductId>>>,
}

impl MemoryRecommendationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecommendationCache for MemoryRecommendationCache {
    async fn get(&self, product_id: ProductId) -> Result<Option<Vec<ProductId>>, StoreError> {
        Ok(self.entries.lock().expect("cache lock poisoned").get(&product_id.0).cloned())
    }

    async fn put(
        &self,
        product_id: ProductId,
        recommended: &[ProductId],
    ) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(product_id.0, recommended.to_vec());
        Ok(())
    }

    async fn invalidate(&self, product_id: Option<ProductId>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match product_id {
            Some(id) => {
                entries.remove(&id.0);
            }
            None => entries.clear(),
        }
        Ok(())
    }
}
