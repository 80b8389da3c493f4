use chrono::Utc;
use sqlx::Row;

use vitrine_core::domain::product::ProductId;
use vitrine_core::errors::StoreError;
use vitrine_core::store::RecommendationCache;

use super::{decode, unavailable};
use crate::DbPool;

/// Persisted memoization of similarity rankings. One row per source
/// product; `put` is a plain last-writer-wins upsert, matching the
/// engine's tolerance for concurrent recomputation.
pub struct SqlRecommendationCache {
    pool: DbPool,
}

impl SqlRecommendationCache {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecommendationCache for SqlRecommendationCache {
    async fn get(&self, product_id: ProductId) -> Result<Option<Vec<ProductId>>, StoreError> {
        let row = sqlx::query(
            "SELECT recommended_ids FROM recommendation_cache WHERE product_id = ?",
        )
        .bind(product_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("recommended_ids").map_err(decode)?;
        let ids: Vec<i64> = serde_json::from_str(&raw)
            .map_err(|e| decode(format!("recommended_ids is not a JSON id array: {e}")))?;
        Ok(Some(ids.into_iter().map(ProductId).collect()))
    }

    async fn put(
        &self,
        product_id: ProductId,
        recommended: &[ProductId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = recommended.iter().map(|id| id.0).collect();
        let raw = serde_json::to_string(&ids)
            .map_err(|e| decode(format!("recommended_ids: {e}")))?;
        sqlx::query(
            "INSERT INTO recommendation_cache (product_id, recommended_ids, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(product_id) DO UPDATE SET
                recommended_ids = excluded.recommended_ids,
                updated_at = excluded.updated_at",
        )
        .bind(product_id.0)
        .bind(&raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn invalidate(&self, product_id: Option<ProductId>) -> Result<(), StoreError> {
        match product_id {
            Some(id) => {
                sqlx::query("DELETE FROM recommendation_cache WHERE product_id = ?")
                    .bind(id.0)
                    .execute(&self.pool)
                    .await
                    .map_err(unavailable)?;
            }
            None => {
                sqlx::query("DELETE FROM recommendation_cache")
                    .execute(&self.pool)
                    .await
                    .map_err(unavailable)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect_with_settings, migrations};

    async fn cache() -> SqlRecommendationCache {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.unwrap();
        migrations::run_pending(&pool).await.unwrap();
        SqlRecommendationCache::new(pool)
    }

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId).collect()
    }

    #[tokio::test]
    async fn get_is_absent_before_any_put() {
        let cache = cache().await;
        assert_eq!(cache.get(ProductId(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_preserves_order_and_upserts() {
        let cache = cache().await;
        cache.put(ProductId(1), &ids(&[5, 3, 9])).await.unwrap();
        assert_eq!(cache.get(ProductId(1)).await.unwrap(), Some(ids(&[5, 3, 9])));

        cache.put(ProductId(1), &ids(&[2])).await.unwrap();
        assert_eq!(cache.get(ProductId(1)).await.unwrap(), Some(ids(&[2])));
    }

    #[tokio::test]
    async fn invalidate_targets_one_entry_or_all() {
        let cache = cache().await;
        cache.put(ProductId(1), &ids(&[2])).await.unwrap();
        cache.put(ProductId(2), &ids(&[1])).await.unwrap();

        cache.invalidate(Some(ProductId(1))).await.unwrap();
        assert_eq!(cache.get(ProductId(1)).await.unwrap(), None);
        assert!(cache.get(ProductId(2)).await.unwrap().is_some());

        cache.invalidate(None).await.unwrap();
        assert_eq!(cache.get(ProductId(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_entry_surfaces_as_decode_error() {
        let cache = cache().await;
        sqlx::query(
            "INSERT INTO recommendation_cache (product_id, recommended_ids, updated_at)
             VALUES (1, 'oops', '2024-01-01T00:00:00Z')",
        )
        .execute(&cache.pool)
        .await
        .unwrap();

        assert!(matches!(cache.get(ProductId(1)).await, Err(StoreError::Decode(_))));
    }
}
