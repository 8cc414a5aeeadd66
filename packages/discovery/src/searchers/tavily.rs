//! Tavily search backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DiscoveryError, Result};
use crate::traits::SearchProvider;
use crate::types::SearchHit;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Tavily API client for web search.
///
/// Passes queries through unchanged; Tavily's own relevance ranking does
/// the shaping.
pub struct TavilyProvider {
    api_key: String,
    client: reqwest::Client,
    max_results: usize,
}

/// Tavily search depth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum SearchDepth {
    Basic,
}

#[derive(Debug, Serialize)]
struct TavilyRequest {
    api_key: String,
    query: String,
    search_depth: SearchDepth,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

impl TavilyProvider {
    /// Create a new Tavily provider.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            max_results: 10,
        })
    }

    /// Create from the `TAVILY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TAVILY_API_KEY")
            .map_err(|_| DiscoveryError::Config("TAVILY_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    /// Set the per-query result limit (default: 10).
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let request = TavilyRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            search_depth: SearchDepth::Basic,
            max_results: self.max_results,
        };

        let response = self.client.post(TAVILY_API_URL).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Provider {
                provider: self.name(),
                message: format!("Tavily API error {}: {}", status, body),
            });
        }

        let tavily_response: TavilyResponse = response.json().await?;

        let hits = tavily_response
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.content,
                published_date: r.published_date,
                author: None,
            })
            .collect();

        Ok(hits)
    }
}
