//! Normalization of loose remote recommendation records into the strict
//! [`Item`] model.
//!
//! The remote side has drifted through several response shapes and field
//! spellings. Everything funnels through one mapping function with literal
//! defaults, so no optional handling leaks past this boundary.

use serde_json::Value;

use osusume_core::models::{Category, Item};

pub const DEFAULT_TITLE: &str = "Unknown Title";
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Normalize a full response body into items for the given category.
///
/// Accepts a bare array, or an object keyed `recommendations`, `data`, or
/// `items` (first present wins). Anything else normalizes to no items.
pub fn normalize_response(body: &Value, category: Category) -> Vec<Item> {
    record_array(body)
        .iter()
        .enumerate()
        .filter_map(|(index, record)| normalize_record(record, category, index))
        .collect()
}

/// Map one remote record into an [`Item`], applying literal defaults for
/// anything missing. Returns `None` only for non-object values; a record
/// is never dropped for missing fields.
pub fn normalize_record(record: &Value, category: Category, index: usize) -> Option<Item> {
    if !record.is_object() {
        return None;
    }
    Some(Item {
        id: id_field(record, index),
        title: string_field(record, &["title", "name"])
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        category,
        genre: string_field(record, &["genre", "type", "genres"]).unwrap_or_default(),
        description: Some(
            string_field(record, &["description", "synopsis", "overview"])
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        ),
        rating: Some(numeric_field(record, &["rating", "score", "averageRating"]).unwrap_or(0.0)),
        image_url: string_field(record, &["imageUrl", "image_url", "image", "poster"]),
    })
}

fn record_array(body: &Value) -> &[Value] {
    if let Some(array) = body.as_array() {
        return array;
    }
    for key in ["recommendations", "data", "items"] {
        if let Some(array) = body.get(key).and_then(Value::as_array) {
            return array;
        }
    }
    &[]
}

/// First non-empty string among the given field spellings. String arrays
/// (e.g. a `genres` list) are joined with `", "`.
fn string_field(record: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match record.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Array(parts)) => {
            let joined = parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    })
}

/// Numeric field that may arrive as a number or a numeric string.
fn numeric_field(record: &Value, names: &[&str]) -> Option<f32> {
    names.iter().find_map(|name| match record.get(name) {
        Some(Value::Number(n)) => n.as_f64().map(|v| v as f32),
        Some(Value::String(s)) => s.trim().parse::<f32>().ok(),
        _ => None,
    })
}

/// Record id as a string, whether it arrived as a string or a number.
/// Falls back to a deterministic per-response index.
fn id_field(record: &Value, index: usize) -> String {
    for name in ["id", "movieId", "itemId"] {
        match record.get(name) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    format!("rec-{index}")
}
