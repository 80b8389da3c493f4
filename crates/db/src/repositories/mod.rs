//! SQLite-backed implementations of the engine's collaborator stores.

use vitrine_core::errors::StoreError;

pub mod cache;
pub mod catalog;

pub use cache::SqlRecommendationCache;
pub use catalog::SqlCatalogStore;

pub(crate) fn unavailable(error: sqlx::Error) -> StoreError {
    StoreError::Unavailable(error.to_string())
}

pub(crate) fn decode(message: impl std::fmt::Display) -> StoreError {
    StoreError::Decode(message.to_string())
}
