//! TF-IDF vectorization over a small in-memory corpus.
//!
//! Matches the weighting the original pipeline used: smooth inverse
//! document frequency (`ln((1 + n) / (1 + df)) + 1`) with L2-normalized
//! rows, so cosine similarity reduces to a sparse dot product.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RankError {
    /// Every document tokenized to nothing (empty feature strings, or all
    /// tokens removed by the stopword filter). There is no signal to rank
    /// on; callers fall back to category-based recommendations.
    #[error("degenerate corpus: no terms survived tokenization")]
    DegenerateCorpus,
}

/// A document vector as (term index, weight) pairs, sorted by term index.
pub type SparseRow = Vec<(usize, f64)>;

#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    /// Vectorizer with the built-in English stopword list.
    pub fn english() -> Self {
        Self::with_stop_words(super::stopwords::ENGLISH.iter().copied())
    }

    /// Vectorizer with a caller-supplied stopword set (locale-appropriate
    /// lists for non-English catalogs).
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words =
            words.into_iter().map(|word| word.as_ref().to_lowercase()).collect::<HashSet<_>>();
        Self { stop_words }
    }

    /// Lowercase, split on word boundaries, drop stopwords.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty() && !self.stop_words.contains(*token))
            .map(str::to_owned)
            .collect()
    }

    /// Build the TF-IDF matrix for `documents`, one L2-normalized sparse
    /// row per document in input order.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<SparseRow>, RankError> {
        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|doc| self.tokenize(doc.as_ref())).collect();

        // First-seen vocabulary order keeps the matrix deterministic for a
        // fixed corpus ordering.
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        for tokens in &tokenized {
            let mut seen_in_doc = HashSet::new();
            for token in tokens {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token.clone()).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if seen_in_doc.insert(index) {
                    document_frequency[index] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            return Err(RankError::DegenerateCorpus);
        }

        let n_documents = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for token in tokens {
                    let index = vocabulary[token];
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }

                let mut row: SparseRow =
                    counts.into_iter().map(|(index, tf)| (index, tf * idf[index])).collect();
                row.sort_by_key(|&(index, _)| index);

                let norm = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for entry in &mut row {
                        entry.1 /= norm;
                    }
                }
                row
            })
            .collect();

        Ok(rows)
    }
}

/// Cosine similarity between two sparse rows. Zero-norm rows are orthogonal
/// to everything, yielding 0.0 rather than an error.
pub fn cosine_similarity(a: &SparseRow, b: &SparseRow) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    let norm_a = a.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
