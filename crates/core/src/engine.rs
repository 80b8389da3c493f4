//! The recommendation orchestrator: composes the similarity ranker, rule
//! engine, memoization cache, and category/trending fallbacks into bounded,
//! de-duplicated result lists.
//!
//! One explicit, constructible service with injected collaborators —
//! multiple independent instances can coexist (tests run one per case).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::RecommenderConfig;
use crate::domain::product::{Product, ProductId};
use crate::errors::EngineError;
use crate::ranking::{rank_by_similarity, TfidfVectorizer};
use crate::rules::RuleEngine;
use crate::store::{CatalogFilter, CatalogStore, RecommendationCache};

/// A catalog write the engine must react to. Creation clears the whole
/// cache (a new product can enter anyone's top matches); update and delete
/// clear only the product's own entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogMutation {
    Created,
    Updated(ProductId),
    Deleted(ProductId),
}

pub struct Recommender {
    catalog: Arc<dyn CatalogStore>,
    cache: Arc<dyn RecommendationCache>,
    rules: RuleEngine,
    vectorizer: TfidfVectorizer,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn CatalogStore>, cache: Arc<dyn RecommendationCache>) -> Self {
        Self::with_config(catalog, cache, &RecommenderConfig::default())
    }

    pub fn with_config(
        catalog: Arc<dyn CatalogStore>,
        cache: Arc<dyn RecommendationCache>,
        config: &RecommenderConfig,
    ) -> Self {
        let vectorizer = match &config.stopwords {
            Some(words) => TfidfVectorizer::with_stop_words(words),
            None => TfidfVectorizer::english(),
        };
        Self {
            catalog,
            cache,
            rules: RuleEngine::new(config.rules.clone()),
            vectorizer,
        }
    }

    /// Content-similarity recommendations for a product, memoized per
    /// target. A missing target yields an empty list. On a degenerate
    /// corpus the category fallback supplies the result, which is cached
    /// like a normal computation.
    pub async fn similarity_recommendations(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, EngineError> {
        let Some(target) = self.catalog.get_product(product_id).await? else {
            return Ok(Vec::new());
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        if let Some(cached_ids) = self.cache.get(product_id).await? {
            match self.resolve_cached(&cached_ids).await? {
                Some(mut products) => {
                    tracing::debug!(product_id = product_id.0, "recommendation cache hit");
                    products.truncate(limit);
                    return Ok(products);
                }
                None => {
                    // Any unresolvable id makes the whole entry stale.
                    tracing::debug!(product_id = product_id.0, "stale cache entry dropped");
                    self.cache.invalidate(Some(product_id)).await?;
                }
            }
        }

        let candidates = self
            .catalog
            .list_products(&CatalogFilter::all().excluding(product_id))
            .await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ranked_ids = match rank_by_similarity(&target, &candidates, limit, &self.vectorizer)
        {
            Ok(ids) => ids,
            Err(error) => {
                tracing::warn!(
                    product_id = product_id.0,
                    %error,
                    "similarity ranking failed, falling back to category"
                );
                self.category_recommendations(product_id, limit)
                    .await?
                    .into_iter()
                    .map(|p| p.id)
                    .collect()
            }
        };

        self.cache.put(product_id, &ranked_ids).await?;

        let by_id: HashMap<ProductId, &Product> =
            candidates.iter().map(|p| (p.id, p)).collect();
        let mut products: Vec<Product> = ranked_ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|p| (*p).clone()))
            .collect();
        products.truncate(limit);
        Ok(products)
    }

    /// Deterministic rule-based recommendations (no cache involvement).
    pub async fn rule_recommendations(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, EngineError> {
        let Some(target) = self.catalog.get_product(product_id).await? else {
            return Ok(Vec::new());
        };
        let candidates = self
            .catalog
            .list_products(&CatalogFilter::all().excluding(product_id))
            .await?;
        Ok(self.rules.recommend(&target, &candidates, limit))
    }

    /// Same-category products, the bottom of the fallback chain.
    pub async fn category_recommendations(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, EngineError> {
        let Some(target) = self.catalog.get_product(product_id).await? else {
            return Ok(Vec::new());
        };
        let mut same_category = self
            .catalog
            .list_products(
                &CatalogFilter::all().excluding(product_id).in_category(target.category),
            )
            .await?;
        same_category.truncate(limit);
        Ok(same_category)
    }

    /// The combined product-detail result: half similarity, half rules,
    /// de-duplicated (similarity wins ties), topped up from the category
    /// fallback until `limit` or catalog exhaustion.
    pub async fn page_recommendations(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, EngineError> {
        if self.catalog.get_product(product_id).await?.is_none() {
            return Ok(Vec::new());
        }

        let half = limit / 2;
        let similar = self.similarity_recommendations(product_id, half).await?;
        let ruled = self.rule_recommendations(product_id, half).await?;

        let mut seen: HashSet<ProductId> = HashSet::new();
        seen.insert(product_id);
        let mut merged: Vec<Product> = Vec::with_capacity(limit);
        for product in similar.into_iter().chain(ruled) {
            if merged.len() == limit {
                break;
            }
            if seen.insert(product.id) {
                merged.push(product);
            }
        }

        if merged.len() < limit {
            for product in self.category_recommendations(product_id, limit).await? {
                if merged.len() == limit {
                    break;
                }
                if seen.insert(product.id) {
                    merged.push(product);
                }
            }
        }

        merged.truncate(limit);
        Ok(merged)
    }

    /// Featured products first, most recently created next — the rail shown
    /// when there is no target product context.
    pub async fn trending_recommendations(
        &self,
        limit: usize,
    ) -> Result<Vec<Product>, EngineError> {
        let mut trending =
            self.catalog.list_products(&CatalogFilter::all().featured_only()).await?;
        trending.truncate(limit);

        if trending.len() < limit {
            let seen: HashSet<ProductId> = trending.iter().map(|p| p.id).collect();
            let latest =
                self.catalog.list_products(&CatalogFilter::all().newest_first()).await?;
            for product in latest {
                if trending.len() == limit {
                    break;
                }
                if !seen.contains(&product.id) {
                    trending.push(product);
                }
            }
        }

        Ok(trending)
    }

    /// Drop one cached entry, or all of them.
    pub async fn clear_cache(&self, product_id: Option<ProductId>) -> Result<(), EngineError> {
        self.cache.invalidate(product_id).await?;
        Ok(())
    }

    /// Apply the conservative invalidation policy for a catalog write.
    pub async fn on_catalog_mutation(
        &self,
        mutation: CatalogMutation,
    ) -> Result<(), EngineError> {
        match mutation {
            CatalogMutation::Created => self.clear_cache(None).await,
            CatalogMutation::Updated(id) | CatalogMutation::Deleted(id) => {
                self.clear_cache(Some(id)).await
            }
        }
    }

    /// Resolve every cached id to a live product; `None` when any id no
    /// longer exists (the entry is then treated as a full miss rather than
    /// served silently shrunken).
    async fn resolve_cached(
        &self,
        ids: &[ProductId],
    ) -> Result<Option<Vec<Product>>, EngineError> {
        if ids.is_empty() {
            return Ok(None);
        }
        let mut products = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.catalog.get_product(id).await? {
                Some(product) => products.push(product),
                None => return Ok(None),
            }
        }
        Ok(Some(products))
    }
}
