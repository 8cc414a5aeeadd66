//! SerpAPI (Google) search backend.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{DiscoveryError, Result};
use crate::traits::SearchProvider;
use crate::types::SearchHit;

const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// SerpAPI client searching the Google engine.
///
/// Wraps incoming queries in a purchase-intent phrase ("where to buy ...
/// online") so organic results skew toward storefronts rather than
/// editorial pages.
pub struct SerpApiProvider {
    api_key: String,
    client: reqwest::Client,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl SerpApiProvider {
    /// Create a new SerpAPI provider.
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

    /// Create from the `SERPAPI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SERPAPI_API_KEY")
            .map_err(|_| DiscoveryError::Config("SERPAPI_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    /// Set the per-query result limit (default: 10).
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    fn shape_query(query: &str) -> String {
        format!("where to buy {} online", query)
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let shaped = Self::shape_query(query);

        let response = self
            .client
            .get(SERPAPI_URL)
            .query(&[
                ("engine", "google"),
                ("q", shaped.as_str()),
                ("num", &self.max_results.to_string()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Provider {
                provider: self.name(),
                message: format!("SerpAPI error {}: {}", status, body),
            });
        }

        let serp_response: SerpResponse = response.json().await?;

        let hits = serp_response
            .organic_results
            .into_iter()
            .take(self.max_results)
            .map(|r| SearchHit {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
                published_date: r.date,
                author: None,
            })
            .collect();

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_shaping_adds_purchase_intent() {
        assert_eq!(
            SerpApiProvider::shape_query("Theragun Mini"),
            "where to buy Theragun Mini online"
        );
    }
}
