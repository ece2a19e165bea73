use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use osusume_core::models::{Category, Item};
use osusume_core::session::RequestContext;

use crate::error::ApiError;
use crate::traits::RecommendationApi;
use crate::types::normalize_response;

/// How many recent history titles ride along as request context.
const CONTEXT_LIMIT: usize = 10;

/// HTTP client for the remote recommendation service.
pub struct RecommendationClient {
    base_url: String,
    http: Client,
}

impl RecommendationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Build a client with a per-request timeout (config values).
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::Api {
                status,
                message: body,
            })
        }
    }
}

impl RecommendationApi for RecommendationClient {
    async fn query(
        &self,
        category: Category,
        genre: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Vec<Item>, ApiError> {
        let mut request = self
            .http
            .get(format!("{}/recommendations", self.base_url))
            .query(&[("category", category.as_str())]);

        if let Some(genre) = genre {
            request = request.query(&[("genre", genre)]);
        }
        // Recent history titles ride along as informational context; the
        // request goes out the same way without them.
        if !ctx.history.is_empty() {
            let recent: Vec<&str> = ctx
                .history
                .iter()
                .rev()
                .take(CONTEXT_LIMIT)
                .map(|entry| entry.title.as_str())
                .collect();
            request = request.query(&[("context", recent.join("|"))]);
        }
        if let Some(token) = &ctx.access_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let resp = request.send().await?;
        let resp = Self::check_response(resp).await?;
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let items = normalize_response(&body, category);
        debug!(%category, count = items.len(), "remote recommendations received");
        Ok(items)
    }
}
