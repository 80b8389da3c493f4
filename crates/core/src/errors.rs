use thiserror::Error;

/// Failure reaching or decoding one of the backing stores. Unlike the
/// recoverable recommendation failures, these propagate to the caller:
/// no meaningful recommendation exists without data access.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt record: {0}")]
    Decode(String),
}

/// Errors surfaced by the recommendation engine. A missing target product
/// is deliberately not represented here — it yields an empty result, since
/// the recommendation surface is customer-facing and degrades rather than
/// fails. Degenerate-corpus vectorization failures are recovered internally
/// via the category fallback and never reach this type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_into_engine_error() {
        let engine: EngineError = StoreError::Unavailable("connection refused".to_owned()).into();
        assert!(matches!(engine, EngineError::Store(StoreError::Unavailable(_))));
    }

    #[test]
    fn display_carries_the_backend_message() {
        let error = StoreError::Decode("tags column is not valid JSON".to_owned());
        assert_eq!(error.to_string(), "corrupt record: tags column is not valid JSON");
    }
}
