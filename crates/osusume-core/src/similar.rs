use std::collections::HashSet;

use crate::models::Item;

/// Suggestions produced per like.
pub const BATCH_SIZE: usize = 4;

/// Derives the next recommendation batch from a just-liked item.
///
/// Implementations must be deterministic: the session relies on pool order
/// being preserved. The session contract does not change when a different
/// model is plugged in.
pub trait SimilarityModel {
    fn select(
        &self,
        liked: &Item,
        pool: &[Item],
        liked_ids: &HashSet<String>,
        skipped_ids: &HashSet<String>,
    ) -> Vec<Item>;
}

/// One-hop genre-equality heuristic: items sharing the liked item's genre,
/// minus anything already liked or skipped, in pool order, capped at
/// [`BATCH_SIZE`]. An intentionally simple stand-in for a remote scoring
/// model.
pub struct GenreMatch;

impl SimilarityModel for GenreMatch {
    fn select(
        &self,
        liked: &Item,
        pool: &[Item],
        liked_ids: &HashSet<String>,
        skipped_ids: &HashSet<String>,
    ) -> Vec<Item> {
        pool.iter()
            .filter(|item| item.genre == liked.genre)
            .filter(|item| item.id != liked.id)
            .filter(|item| !liked_ids.contains(&item.id))
            .filter(|item| !skipped_ids.contains(&item.id))
            .take(BATCH_SIZE)
            .cloned()
            .collect()
    }
}
