//! Trait definition for the remote recommendation boundary.
//!
//! The fallback fetcher is generic over `RecommendationApi`, so tests
//! substitute failing or fixed doubles for the real HTTP client.

use std::future::Future;

use osusume_core::models::{Category, Item};
use osusume_core::session::RequestContext;

use crate::error::ApiError;

/// One remote recommendation query, scoped by category and optionally by
/// genre. Implementations make exactly one attempt per call; re-triggering
/// is up to the user.
pub trait RecommendationApi: Send + Sync {
    fn query(
        &self,
        category: Category,
        genre: Option<&str>,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<Vec<Item>, ApiError>> + Send;
}
