//! Content-similarity ranking: TF-IDF over product feature strings plus
//! cosine similarity, with deterministic top-k selection.

pub mod stopwords;
mod tfidf;

pub use tfidf::{cosine_similarity, RankError, SparseRow, TfidfVectorizer};

use crate::domain::product::{Product, ProductId};
use crate::features::feature_text;

/// Rank `candidates` by content similarity to `target` and return the ids
/// of the `limit` best matches, highest first.
///
/// The corpus is the target's feature string followed by every candidate's,
/// in slice order. Ties are broken by that order (stable sort on descending
/// score), so the result is deterministic for a fixed catalog ordering.
/// An empty candidate slice is an empty result, not an error.
pub fn rank_by_similarity(
    target: &Product,
    candidates: &[Product],
    limit: usize,
    vectorizer: &TfidfVectorizer,
) -> Result<Vec<ProductId>, RankError> {
    if candidates.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut corpus = Vec::with_capacity(candidates.len() + 1);
    corpus.push(feature_text(target));
    corpus.extend(candidates.iter().map(feature_text));

    let rows = vectorizer.fit_transform(&corpus)?;
    let target_row = &rows[0];

    let mut scored: Vec<(usize, f64)> = rows[1..]
        .iter()
        .enumerate()
        .map(|(index, row)| (index, cosine_similarity(target_row, row)))
        .collect();

    // Stable sort: equal scores keep first-seen (corpus) order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    Ok(scored.into_iter().map(|(index, _)| candidates[index].id).collect())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn product(id: i64, category: &str, color: Option<&str>, tags: &[&str]) -> Product {
        Product {
            id: ProductId(id),
            name: format!("item-{id}"),
            description: None,
            category: category.to_owned(),
            price: 100.0,
            color: color.map(str::to_owned),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            stock: 1,
            featured: false,
            thumbnail_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn most_similar_candidate_ranks_first() {
        let target = product(1, "dress", Some("red"), &["soiree"]);
        let candidates = vec![
            product(2, "pants", Some("blue"), &["casual"]),
            product(3, "dress", Some("red"), &["soiree"]),
            product(4, "dress", Some("white"), &[]),
        ];

        let ranked = rank_by_similarity(&target, &candidates, 3, &TfidfVectorizer::english())
            .unwrap();
        assert_eq!(ranked[0], ProductId(3));
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let target = product(1, "dress", None, &[]);
        // Both candidates share exactly the same feature text.
        let candidates = vec![
            product(9, "dress", Some("red"), &[]),
            product(5, "dress", Some("red"), &[]),
        ];

        let first = rank_by_similarity(&target, &candidates, 2, &TfidfVectorizer::english())
            .unwrap();
        let second = rank_by_similarity(&target, &candidates, 2, &TfidfVectorizer::english())
            .unwrap();
        assert_eq!(first, vec![ProductId(9), ProductId(5)]);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_candidates_produce_empty_result() {
        let target = product(1, "dress", None, &[]);
        let ranked =
            rank_by_similarity(&target, &[], 4, &TfidfVectorizer::english()).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn limit_truncates_the_ranking() {
        let target = product(1, "dress", Some("red"), &[]);
        let candidates = vec![
            product(2, "dress", Some("red"), &[]),
            product(3, "dress", None, &[]),
            product(4, "bag", None, &[]),
        ];

        let ranked = rank_by_similarity(&target, &candidates, 2, &TfidfVectorizer::english())
            .unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn all_blank_features_report_degenerate_corpus() {
        let target = product(1, "", None, &[]);
        let candidates = vec![product(2, "", None, &[])];
        let result = rank_by_similarity(&target, &candidates, 2, &TfidfVectorizer::english());
        assert_eq!(result.unwrap_err(), RankError::DegenerateCorpus);
    }
}
