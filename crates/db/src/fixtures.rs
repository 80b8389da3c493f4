//! Deterministic boutique catalog fixtures.
//!
//! One canonical dataset shared by the CLI `seed` command and the
//! integration tests. Items are chosen so every recommendation path has
//! material to work with: several dresses for category fallback, bags and
//! shoes for the dress rule, black/red/gold items for the complementary
//! palette, occasion-tagged pieces, and a pair of featured products for
//! the trending rail.

use chrono::{Duration, Utc};

use vitrine_core::domain::product::{Product, ProductId};
use vitrine_core::errors::StoreError;
use vitrine_core::store::{CatalogFilter, CatalogStore};

use crate::repositories::SqlCatalogStore;
use crate::DbPool;

struct SeedProduct {
    id: i64,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price: f64,
    color: Option<&'static str>,
    tags: &'static [&'static str],
    stock: u32,
    featured: bool,
    age_days: i64,
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        id: 1,
        name: "Classic T-Shirt",
        description: "Everyday cotton tee with a relaxed fit",
        category: "shirt",
        price: 150.0,
        color: Some("black"),
        tags: &["casual", "cotton"],
        stock: 10,
        featured: false,
        age_days: 40,
    },
    SeedProduct {
        id: 2,
        name: "Summer Dress",
        description: "Light silk dress for warm days",
        category: "dress",
        price: 350.0,
        color: Some("red"),
        tags: &["summer", "silk"],
        stock: 5,
        featured: false,
        age_days: 30,
    },
    SeedProduct {
        id: 3,
        name: "Leather Bag",
        description: "Hand-stitched leather shoulder bag",
        category: "bag",
        price: 500.0,
        color: Some("brown"),
        tags: &[],
        stock: 8,
        featured: true,
        age_days: 25,
    },
    SeedProduct {
        id: 4,
        name: "High Heels",
        description: "Classic heels for evening wear",
        category: "shoes",
        price: 450.0,
        color: Some("black"),
        tags: &["evening"],
        stock: 12,
        featured: false,
        age_days: 20,
    },
    SeedProduct {
        id: 5,
        name: "White Blouse",
        description: "Crisp cotton blouse",
        category: "shirt",
        price: 250.0,
        color: Some("white"),
        tags: &["casual"],
        stock: 15,
        featured: false,
        age_days: 15,
    },
    SeedProduct {
        id: 6,
        name: "Blue Jeans",
        description: "Stretch denim, straight cut",
        category: "pants",
        price: 400.0,
        color: Some("blue"),
        tags: &["casual", "denim"],
        stock: 20,
        featured: false,
        age_days: 12,
    },
    SeedProduct {
        id: 7,
        name: "فستان سواريه",
        description: "فستان سواريه أنيق بتصميم عصري يناسب المناسبات المسائية",
        category: "dress",
        price: 900.0,
        color: Some("black"),
        tags: &["soiree", "سواريه"],
        stock: 3,
        featured: true,
        age_days: 8,
    },
    SeedProduct {
        id: 8,
        name: "Evening Clutch",
        description: "Compact clutch with a gold chain",
        category: "accessory",
        price: 300.0,
        color: Some("gold"),
        tags: &["evening"],
        stock: 6,
        featured: false,
        age_days: 5,
    },
    SeedProduct {
        id: 9,
        name: "Gold Necklace",
        description: "Delicate layered necklace",
        category: "إكسسوار",
        price: 280.0,
        color: Some("gold"),
        tags: &["soiree"],
        stock: 9,
        featured: false,
        age_days: 3,
    },
    SeedProduct {
        id: 10,
        name: "Velvet Dress",
        description: "Deep-cut velvet evening dress",
        category: "dress",
        price: 750.0,
        color: Some("white"),
        tags: &["evening", "winter"],
        stock: 4,
        featured: false,
        age_days: 1,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct SeedResult {
    pub products_seeded: usize,
}

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Canonical seed catalog, load/verify pair.
pub struct SeedDataset;

impl SeedDataset {
    /// Materialize the seed catalog. Anchored relative to "now" so recency
    /// ordering is stable regardless of when the seed runs.
    pub fn products() -> Vec<Product> {
        let now = Utc::now();
        SEED_PRODUCTS
            .iter()
            .map(|seed| Product {
                id: ProductId(seed.id),
                name: seed.name.to_owned(),
                description: Some(seed.description.to_owned()),
                category: seed.category.to_owned(),
                price: seed.price,
                color: seed.color.map(str::to_owned),
                tags: seed.tags.iter().map(|t| (*t).to_owned()).collect(),
                stock: seed.stock,
                featured: seed.featured,
                thumbnail_url: None,
                created_at: now - Duration::days(seed.age_days),
            })
            .collect()
    }

    /// Upsert the full dataset; safe to run repeatedly.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, StoreError> {
        let catalog = SqlCatalogStore::new(pool.clone());
        let products = Self::products();
        for product in &products {
            catalog.upsert_product(product).await?;
        }
        tracing::debug!(count = products.len(), "seed catalog loaded");
        Ok(SeedResult { products_seeded: products.len() })
    }

    /// Cheap structural checks that the dataset supports every
    /// recommendation path.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, StoreError> {
        let catalog = SqlCatalogStore::new(pool.clone());
        let all = catalog.list_products(&CatalogFilter::all()).await?;
        let featured = catalog.list_products(&CatalogFilter::all().featured_only()).await?;
        let dresses =
            catalog.list_products(&CatalogFilter::all().in_category("dress")).await?;

        let checks: Vec<(&'static str, bool)> = vec![
            ("product_count", all.len() == SEED_PRODUCTS.len()),
            ("featured_products", featured.len() == 2),
            ("dress_category", dresses.len() >= 3),
            (
                "accessory_material",
                all.iter().any(|p| p.category == "bag") && all.iter().any(|p| p.category == "shoes"),
            ),
            (
                "occasion_tags",
                all.iter().any(|p| p.tags.iter().any(|t| t == "soiree" || t == "سواريه")),
            ),
        ];
        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn load_then_verify_passes_every_check() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.unwrap();
        migrations::run_pending(&pool).await.unwrap();

        let result = SeedDataset::load(&pool).await.unwrap();
        assert_eq!(result.products_seeded, 10);

        let verification = SeedDataset::verify(&pool).await.unwrap();
        assert!(
            verification.all_present,
            "failed checks: {:?}",
            verification
                .checks
                .iter()
                .filter(|(_, passed)| !passed)
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.unwrap();
        migrations::run_pending(&pool).await.unwrap();

        SeedDataset::load(&pool).await.unwrap();
        SeedDataset::load(&pool).await.unwrap();
        assert!(SeedDataset::verify(&pool).await.unwrap().all_present);
    }
}
