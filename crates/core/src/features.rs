//! Feature extraction: projects a product into the flat text string the
//! similarity ranker vectorizes.

use crate::domain::product::Product;

/// Only the head of the description feeds the ranker; long marketing text
/// past this point is mostly noise.
pub const DESCRIPTION_PREFIX_CHARS: usize = 50;

/// Build the space-joined feature string for a product: category, color,
/// tags, then the description prefix, skipping absent fields. No casing or
/// punctuation normalization happens here; the ranker's tokenizer owns that.
pub fn feature_text(product: &Product) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if !product.category.is_empty() {
        parts.push(&product.category);
    }
    if let Some(color) = product.color.as_deref() {
        if !color.is_empty() {
            parts.push(color);
        }
    }
    for tag in &product.tags {
        if !tag.is_empty() {
            parts.push(tag);
        }
    }

    let mut text = parts.join(" ");
    if let Some(description) = product.description.as_deref() {
        // Truncate on char boundaries; catalog text includes Arabic.
        let prefix: String = description.chars().take(DESCRIPTION_PREFIX_CHARS).collect();
        if !prefix.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&prefix);
        }
    }

    text
}
