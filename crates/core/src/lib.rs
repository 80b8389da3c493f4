pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod features;
pub mod ranking;
pub mod rules;
pub mod store;

pub use config::{AppConfig, DatabaseConfig, RecommenderConfig};
pub use domain::product::{Product, ProductId};
pub use engine::{CatalogMutation, Recommender};
pub use errors::{EngineError, StoreError};
pub use ranking::{rank_by_similarity, RankError, TfidfVectorizer};
pub use rules::{RuleConfig, RuleEngine};
pub use store::{CatalogFilter, CatalogStore, RecommendationCache};
