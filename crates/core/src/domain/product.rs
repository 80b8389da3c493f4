use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog item as the engine sees it. The record is an immutable input
/// per call; identity (`id`) is the only field the engine relies on for
/// de-duplication and ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub color: Option<String>,
    /// Merchandising tags, e.g. "casual", "summer", "soiree".
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive category comparison, the matching rule used across
    /// the engine (catalog labels are free text).
    pub fn category_matches(&self, other: &str) -> bool {
        self.category.eq_ignore_ascii_case(other)
    }
}
