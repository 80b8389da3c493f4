use std::path::Path;
use std::sync::Arc;

use super::{with_pool, CommandResult};
use vitrine_core::domain::product::ProductId;
use vitrine_core::engine::Recommender;
use vitrine_db::{SqlCatalogStore, SqlRecommendationCache};

pub fn run(config_path: &Path, product_id: Option<i64>) -> CommandResult {
    with_pool("clear-cache", config_path, |config, pool| async move {
        let engine = Recommender::with_config(
            Arc::new(SqlCatalogStore::new(pool.clone())),
            Arc::new(SqlRecommendationCache::new(pool.clone())),
            &config.recommender,
        );

        let target = product_id.map(ProductId);
        engine
            .clear_cache(target)
            .await
            .map_err(|error| ("cache_clear", error.to_string(), 5u8))?;

        let message = match target {
            Some(id) => format!("cleared cache entry for product {id}"),
            None => "cleared the entire recommendation cache".to_owned(),
        };
        Ok(CommandResult::success("clear-cache", message))
    })
}
