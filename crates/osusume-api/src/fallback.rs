//! Degraded-path recommendation fetching.
//!
//! Every fetch attempts the remote service exactly once. On any transport
//! or server failure the fixed sample table for the category is substituted
//! and genre-filtered locally. A request either fully succeeds remotely or
//! fully falls back; the two sources are never mixed, and the user
//! re-triggers rather than the fetcher retrying.

use tracing::warn;

use osusume_core::models::{Category, Item};
use osusume_core::session::{FetchOutcome, RecommendationSource, RequestContext};

use crate::traits::RecommendationApi;

/// The fixed sample recommendations shown when the remote service is down,
/// in their defined order.
pub fn sample_items(category: Category) -> Vec<Item> {
    let rows: &[(&str, &str, &str, &str, f32)] = match category {
        Category::Books => &[
            ("1", "Dune", "Sci-Fi", "Epic science fiction novel", 4.5),
            ("2", "The Hobbit", "Fantasy", "Classic fantasy adventure", 4.7),
            ("3", "Gone Girl", "Thriller", "Psychological thriller", 4.2),
            ("4", "The Shining", "Horror", "Masterpiece of horror", 4.4),
        ],
        Category::Movies => &[
            ("6", "Inception", "Sci-Fi", "Mind-bending sci-fi thriller", 4.8),
            ("7", "The Godfather", "Drama", "Classic crime drama", 4.9),
            ("8", "Interstellar", "Sci-Fi", "Space exploration epic", 4.7),
            ("9", "The Conjuring", "Horror", "Supernatural horror", 4.3),
        ],
        Category::Tv => &[
            ("11", "Stranger Things", "Fantasy", "Supernatural mystery series", 4.6),
            ("12", "Breaking Bad", "Drama", "Crime drama masterpiece", 4.9),
            ("13", "The Boys", "Action", "Dark superhero series", 4.5),
            ("14", "Black Mirror", "Sci-Fi", "Technology anthology", 4.7),
        ],
        Category::Podcast => &[
            ("16", "Lore", "Horror", "Dark historical tales", 4.5),
            ("17", "Serial", "Thriller", "True crime investigation", 4.8),
            ("18", "Science Vs", "Sci-Fi", "Science fact vs fiction", 4.6),
            ("19", "This American Life", "Drama", "Human interest stories", 4.7),
        ],
    };

    rows.iter()
        .map(|(id, title, genre, description, rating)| Item {
            id: (*id).to_string(),
            title: (*title).to_string(),
            category,
            genre: (*genre).to_string(),
            description: Some((*description).to_string()),
            rating: Some(*rating),
            image_url: None,
        })
        .collect()
}

/// Wraps a remote recommendation query with local sample-data substitution.
pub struct FallbackFetcher<A> {
    api: A,
}

impl<A: RecommendationApi> FallbackFetcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RecommendationApi> RecommendationSource for FallbackFetcher<A> {
    async fn fetch(
        &self,
        category: Category,
        genre: Option<&str>,
        ctx: &RequestContext,
    ) -> FetchOutcome {
        match self.api.query(category, genre, ctx).await {
            Ok(items) => FetchOutcome::remote(items),
            Err(err) => {
                warn!(%category, error = %err, "remote recommendations unavailable, using sample data");
                let mut items = sample_items(category);
                if let Some(genre) = genre {
                    items.retain(|item| item.genre == genre);
                }
                FetchOutcome::sample(items)
            }
        }
    }
}
