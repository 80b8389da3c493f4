//! Deterministic, attribute-driven cross-sell rules. Used both as a primary
//! contributor to the page result and as the similarity ranker's fallback
//! companion; no statistical model involved.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::domain::product::{Product, ProductId};

/// Vocabulary driving the rule engine. Defaults carry the boutique's
/// bilingual catalog labels; deployments override via configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    /// Category tokens identifying a dress.
    pub dress_tokens: Vec<String>,
    /// Category tokens identifying accessories (bags, shoes, ...).
    pub accessory_categories: Vec<String>,
    /// color -> complementary colors.
    pub complementary_colors: HashMap<String, Vec<String>>,
    /// Tags marking evening/occasion wear.
    pub occasion_tags: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        let mut complementary_colors = HashMap::new();
        complementary_colors.insert(
            "black".to_owned(),
            owned(&["white", "red", "gold", "silver", "أبيض", "أحمر", "ذهبي"]),
        );
        complementary_colors.insert("أسود".to_owned(), owned(&["white", "red", "gold", "أبيض", "أحمر", "ذهبي"]));
        complementary_colors.insert("red".to_owned(), owned(&["black", "white", "gold"]));
        complementary_colors.insert("white".to_owned(), owned(&["black", "red", "navy"]));
        complementary_colors.insert("blue".to_owned(), owned(&["white", "beige"]));

        Self {
            dress_tokens: owned(&["dress", "فستان"]),
            accessory_categories: owned(&["bag", "shoe", "accessory", "شنطة", "جزمة", "إكسسوار"]),
            complementary_colors,
            occasion_tags: owned(&["soiree", "evening", "سواريه"]),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_owned()).collect()
}

#[derive(Clone, Debug, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    /// Run every rule the target triggers over `candidates`, merge the
    /// hits keeping first occurrence, and truncate to `limit`. Returns an
    /// empty list when nothing triggers or nothing matches; never an error.
    ///
    /// Rules are non-exclusive and each contributes at most `limit / 2`
    /// products, so one dominant rule cannot fill the whole result.
    pub fn recommend(&self, target: &Product, candidates: &[Product], limit: usize) -> Vec<Product> {
        let per_rule = limit / 2;
        let mut merged: Vec<Product> = Vec::new();
        let mut seen: HashSet<ProductId> = HashSet::new();
        seen.insert(target.id);

        if self.is_dress(target) {
            self.collect(&mut merged, &mut seen, candidates, per_rule, |p| {
                self.is_accessory_category(&p.category)
            });
        }

        if let Some(palette) = self.complement_palette(target) {
            self.collect(&mut merged, &mut seen, candidates, per_rule, |p| {
                p.color
                    .as_deref()
                    .map(|color| palette.contains(&color.to_lowercase()))
                    .unwrap_or(false)
            });
        }

        if self.is_occasion_wear(target) {
            self.collect(&mut merged, &mut seen, candidates, per_rule, |p| {
                self.is_accessory_category(&p.category)
                    || p.tags.iter().any(|tag| self.is_accessory_category(tag))
            });
        }

        merged.truncate(limit);
        merged
    }

    fn collect<F>(
        &self,
        merged: &mut Vec<Product>,
        seen: &mut HashSet<ProductId>,
        candidates: &[Product],
        per_rule: usize,
        matches: F,
    ) where
        F: Fn(&Product) -> bool,
    {
        let mut taken = 0;
        for product in candidates {
            if taken == per_rule {
                break;
            }
            if matches(product) && seen.insert(product.id) {
                merged.push(product.clone());
                taken += 1;
            }
        }
    }

    fn is_dress(&self, product: &Product) -> bool {
        let category = product.category.to_lowercase();
        self.config.dress_tokens.iter().any(|token| category.contains(&token.to_lowercase()))
    }

    fn is_accessory_category(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.config
            .accessory_categories
            .iter()
            .any(|token| label.contains(&token.to_lowercase()))
    }

    fn complement_palette(&self, product: &Product) -> Option<HashSet<String>> {
        let color = product.color.as_deref()?.to_lowercase();
        self.config
            .complementary_colors
            .get(&color)
            .map(|palette| palette.iter().map(|c| c.to_lowercase()).collect())
    }

    fn is_occasion_wear(&self, product: &Product) -> bool {
        product.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            self.config.occasion_tags.iter().any(|occ| occ.to_lowercase() == tag)
        })
    }
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
            price: 200.0,
            color: color.map(str::to_owned),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            stock: 1,
            featured: false,
            thumbnail_url: None,
            created_at: Utc::now(),
        }
    }

    fn engine() -> RuleEngine {
        RuleEngine::new(RuleConfig::default())
    }

    #[test]
    fn red_dress_pulls_accessories_and_complementary_colors() {
        // Catalog: dress(2, red), bag(3, black), shoes(4, black), shirt(1).
        let target = product(2, "dress", Some("red"), &[]);
        let candidates = vec![
            product(1, "shirt", None, &[]),
            product(3, "bag", Some("black"), &[]),
            product(4, "shoes", Some("black"), &[]),
        ];

        let result = engine().recommend(&target, &candidates, 4);
        let ids: Vec<ProductId> = result.iter().map(|p| p.id).collect();
        assert!(ids.contains(&ProductId(3)));
        assert!(ids.contains(&ProductId(4)));
        // The red -> black mapping admits at least one black item.
        assert!(result.iter().any(|p| p.color.as_deref() == Some("black")));
    }

    #[test]
    fn black_dress_matches_only_accessories_or_complements() {
        let target = product(10, "Dress", Some("Black"), &[]);
        let candidates = vec![
            product(11, "bag", Some("brown"), &[]),
            product(12, "shirt", Some("white"), &[]),
            product(13, "pants", Some("blue"), &[]),
            product(14, "shoes", Some("gold"), &[]),
        ];

        let result = engine().recommend(&target, &candidates, 8);
        let config = RuleConfig::default();
        let palette = &config.complementary_colors["black"];
        for p in &result {
            let accessory = engine().is_accessory_category(&p.category);
            let complement = p
                .color
                .as_deref()
                .map(|c| palette.iter().any(|pc| pc.eq_ignore_ascii_case(c)))
                .unwrap_or(false);
            assert!(accessory || complement, "unexpected match: {:?}", p.id);
            assert_ne!(p.id, target.id);
        }
        // Blue pants trigger neither rule.
        assert!(!result.iter().any(|p| p.id == ProductId(13)));
    }

    #[test]
    fn occasion_tag_pulls_accessories() {
        let target = product(1, "dress", None, &["soiree"]);
        let candidates = vec![
            product(2, "accessory", None, &[]),
            product(3, "pants", None, &[]),
            product(4, "clutch", None, &["إكسسوار"]),
        ];

        let result = engine().recommend(&target, &candidates, 4);
        let ids: Vec<ProductId> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId(2), ProductId(4)]);
    }

    #[test]
    fn arabic_dress_category_triggers_the_dress_rule() {
        let target = product(1, "فستان سواريه", None, &[]);
        let candidates = vec![product(2, "شنطة", None, &[]), product(3, "pants", None, &[])];

        let result = engine().recommend(&target, &candidates, 4);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, ProductId(2));
    }

    #[test]
    fn each_rule_is_capped_at_half_the_limit() {
        let target = product(1, "dress", None, &[]);
        let candidates: Vec<Product> =
            (2..10).map(|id| product(id, "bag", None, &[])).collect();

        let result = engine().recommend(&target, &candidates, 4);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn duplicates_across_rules_collapse_to_first_occurrence() {
        // A black bag matches both the dress rule and red->black complement.
        let target = product(1, "dress", Some("red"), &[]);
        let candidates = vec![product(2, "bag", Some("black"), &[])];

        let result = engine().recommend(&target, &candidates, 6);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn nothing_triggers_for_a_plain_shirt() {
        let target = product(1, "shirt", Some("green"), &[]);
        let candidates = vec![product(2, "bag", Some("black"), &[])];
        assert!(engine().recommend(&target, &candidates, 4).is_empty());
    }

    #[test]
    fn rule_config_deserializes_from_toml() {
        let config: RuleConfig = toml::from_str(
            r#"
            dress_tokens = ["gown"]
            occasion_tags = ["gala"]

            [complementary_colors]
            green = ["cream"]
            "#,
        )
        .unwrap();
        assert_eq!(config.dress_tokens, vec!["gown"]);
        assert_eq!(config.complementary_colors["green"], vec!["cream"]);
        // Unspecified fields fall back to defaults.
        assert!(!config.accessory_categories.is_empty());
    }
}
