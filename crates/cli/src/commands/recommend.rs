use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::{with_pool, CommandResult};
use vitrine_core::domain::product::ProductId;
use vitrine_core::engine::Recommender;
use vitrine_db::{SqlCatalogStore, SqlRecommendationCache};

/// Which engine surface to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Page,
    Similarity,
    Rules,
    Trending,
}

impl Surface {
    fn command(self) -> &'static str {
        match self {
            Surface::Page => "recommend",
            Surface::Similarity => "similar",
            Surface::Rules => "rules",
            Surface::Trending => "trending",
        }
    }
}

pub fn run(
    config_path: &Path,
    surface: Surface,
    product_id: Option<i64>,
    limit: Option<usize>,
) -> CommandResult {
    let command = surface.command();
    with_pool(command, config_path, |config, pool| async move {
        let engine = Recommender::with_config(
            Arc::new(SqlCatalogStore::new(pool.clone())),
            Arc::new(SqlRecommendationCache::new(pool.clone())),
            &config.recommender,
        );

        let limit = limit.unwrap_or(match surface {
            Surface::Trending => config.recommender.trending_limit,
            _ => config.recommender.default_limit,
        });

        let products = match (surface, product_id.map(ProductId)) {
            (Surface::Trending, _) => engine.trending_recommendations(limit).await,
            (Surface::Page, Some(id)) => engine.page_recommendations(id, limit).await,
            (Surface::Similarity, Some(id)) => engine.similarity_recommendations(id, limit).await,
            (Surface::Rules, Some(id)) => engine.rule_recommendations(id, limit).await,
            // clap guarantees a product id for product-context surfaces.
            (_, None) => Ok(Vec::new()),
        }
        .map_err(|error| ("recommendation", error.to_string(), 5u8))?;

        let data = serde_json::to_value(&products)
            .map_err(|error| ("serialization", error.to_string(), 5u8))?;
        Ok(CommandResult::success_with_data(
            command,
            format!("{} recommendation(s)", products.len()),
            Some(json!({ "count": products.len(), "recommendations": data })),
        ))
    })
}
