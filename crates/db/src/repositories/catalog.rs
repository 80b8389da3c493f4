use chrono::{DateTime, Utc};
use sqlx::Row;

use vitrine_core::domain::product::{Product, ProductId};
use vitrine_core::errors::StoreError;
use vitrine_core::store::{CatalogFilter, CatalogStore};

use super::{decode, unavailable};
use crate::DbPool;

pub struct SqlCatalogStore {
    pool: DbPool,
}

impl SqlCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert-or-replace a product. This is the catalog's write path; the
    /// engine itself never calls it — callers pair it with
    /// `Recommender::on_catalog_mutation` to keep the cache honest.
    pub async fn upsert_product(&self, product: &Product) -> Result<(), StoreError> {
        let tags_json =
            serde_json::to_string(&product.tags).map_err(|e| decode(format!("tags: {e}")))?;
        sqlx::query(
            "INSERT INTO products
                (id, name, description, category, price, color, tags, stock,
                 featured, thumbnail_url, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                price = excluded.price,
                color = excluded.color,
                tags = excluded.tags,
                stock = excluded.stock,
                featured = excluded.featured,
                thumbnail_url = excluded.thumbnail_url,
                created_at = excluded.created_at",
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.color)
        .bind(&tags_json)
        .bind(product.stock as i64)
        .bind(product.featured)
        .bind(&product.thumbnail_url)
        .bind(product.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, StoreError> {
    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let description: Option<String> = row.try_get("description").map_err(decode)?;
    let category: String = row.try_get("category").map_err(decode)?;
    let price: f64 = row.try_get("price").map_err(decode)?;
    let color: Option<String> = row.try_get("color").map_err(decode)?;
    let tags_json: String = row.try_get("tags").map_err(decode)?;
    let stock: i64 = row.try_get("stock").map_err(decode)?;
    let featured: bool = row.try_get("featured").map_err(decode)?;
    let thumbnail_url: Option<String> = row.try_get("thumbnail_url").map_err(decode)?;
    let created_at_raw: String = row.try_get("created_at").map_err(decode)?;

    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| decode(format!("tags column is not a JSON string array: {e}")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| decode(format!("created_at is not RFC 3339: {e}")))?;

    Ok(Product {
        id: ProductId(id),
        name,
        description,
        category,
        price,
        color,
        tags,
        stock: stock.max(0) as u32,
        featured,
        thumbnail_url,
        created_at,
    })
}

#[async_trait::async_trait]
impl CatalogStore for SqlCatalogStore {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn list_products(&self, filter: &CatalogFilter) -> Result<Vec<Product>, StoreError> {
        let mut sql = String::from("SELECT * FROM products WHERE 1 = 1");
        if filter.exclude.is_some() {
            sql.push_str(" AND id != ?");
        }
        if filter.category.is_some() {
            sql.push_str(" AND LOWER(category) = LOWER(?)");
        }
        if filter.featured.is_some() {
            sql.push_str(" AND featured = ?");
        }
        // Id order is the catalog's canonical iteration order; the ranker's
        // tie-breaking depends on it being stable.
        if filter.newest_first {
            sql.push_str(" ORDER BY created_at DESC, id ASC");
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        let mut query = sqlx::query(&sql);
        if let Some(exclude) = filter.exclude {
            query = query.bind(exclude.0);
        }
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }
        if let Some(featured) = filter.featured {
            query = query.bind(featured);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(unavailable)?;
        rows.iter().map(row_to_product).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{connect_with_settings, migrations};

    async fn store() -> SqlCatalogStore {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.unwrap();
        migrations::run_pending(&pool).await.unwrap();
        SqlCatalogStore::new(pool)
    }

    fn product(id: i64, category: &str, featured: bool, age_days: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("item-{id}"),
            description: Some("quality piece".to_owned()),
            category: category.to_owned(),
            price: 250.0,
            color: Some("black".to_owned()),
            tags: vec!["soiree".to_owned()],
            stock: 3,
            featured,
            thumbnail_url: None,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn upsert_then_get_roundtrips_every_field() {
        let store = store().await;
        let original = product(1, "dress", true, 2);
        store.upsert_product(&original).await.unwrap();

        let fetched = store.get_product(ProductId(1)).await.unwrap().unwrap();
        assert_eq!(fetched.name, original.name);
        assert_eq!(fetched.category, original.category);
        assert_eq!(fetched.tags, original.tags);
        assert!(fetched.featured);
        // RFC 3339 keeps sub-second precision.
        assert_eq!(fetched.created_at, original.created_at);
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let store = store().await;
        store.upsert_product(&product(1, "dress", false, 0)).await.unwrap();
        let mut edited = product(1, "dress", false, 0);
        edited.color = Some("gold".to_owned());
        store.upsert_product(&edited).await.unwrap();

        let fetched = store.get_product(ProductId(1)).await.unwrap().unwrap();
        assert_eq!(fetched.color.as_deref(), Some("gold"));
        let all = store.list_products(&CatalogFilter::all()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn list_filters_compose_and_keep_id_order() {
        let store = store().await;
        for p in [
            product(3, "dress", false, 1),
            product(1, "Dress", true, 5),
            product(2, "bag", true, 3),
        ] {
            store.upsert_product(&p).await.unwrap();
        }

        let dresses = store
            .list_products(&CatalogFilter::all().in_category("dress"))
            .await
            .unwrap();
        assert_eq!(dresses.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![1, 3]);

        let featured_except_1 = store
            .list_products(&CatalogFilter::all().excluding(ProductId(1)).featured_only())
            .await
            .unwrap();
        assert_eq!(featured_except_1.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![2]);

        let newest = store
            .list_products(&CatalogFilter::all().newest_first())
            .await
            .unwrap();
        assert_eq!(newest.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = store().await;
        store.upsert_product(&product(1, "dress", false, 0)).await.unwrap();
        store.delete_product(ProductId(1)).await.unwrap();
        assert!(store.get_product(ProductId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_tags_column_surfaces_as_decode_error() {
        let store = store().await;
        store.upsert_product(&product(1, "dress", false, 0)).await.unwrap();
        sqlx::query("UPDATE products SET tags = 'not json' WHERE id = 1")
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store.get_product(ProductId(1)).await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }
}
