//! Firecrawl metadata backend for arbitrary storefront pages.
//!
//! Two steps: scrape the page to markdown through the Firecrawl API
//! (JavaScript rendering, anti-bot handling), then structure the markdown
//! into a [`ProductRecord`] with the text-completion capability. Accepts
//! any URL; serves as the routed-mode default provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};
use crate::traits::completion::{strip_code_fences, Completion, CompletionOptions};
use crate::traits::MetadataProvider;
use crate::types::{Price, ProductRecord, UNKNOWN_PRODUCT_NAME};

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

/// Page content beyond this is cut before prompting; product pages carry
/// their signal near the top.
const MAX_PAGE_CHARS: usize = 12_000;

pub struct FirecrawlProvider {
    client: reqwest::Client,
    api_key: String,
    completion: Arc<dyn Completion>,
}

#[derive(Serialize)]
struct ScrapeRequest {
    url: String,
    formats: Vec<String>,
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

/// Shape the completion is asked to produce.
#[derive(Debug, Deserialize)]
struct ExtractedProduct {
    name: Option<String>,
    price: Option<ExtractedPrice>,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    availability: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    review_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ExtractedPrice {
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    currency: Option<String>,
}

impl FirecrawlProvider {
    pub fn new(api_key: impl Into<String>, completion: Arc<dyn Completion>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            completion,
        })
    }

    /// Create from the `FIRECRAWL_API_KEY` environment variable.
    pub fn from_env(completion: Arc<dyn Completion>) -> Result<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .map_err(|_| DiscoveryError::Config("FIRECRAWL_API_KEY not set".into()))?;
        Self::new(api_key, completion)
    }

    /// Scrape a page to markdown. Returns the content and the canonical
    /// source URL Firecrawl reports after following redirects.
    async fn scrape(&self, url: &str) -> Result<(String, String)> {
        let request = ScrapeRequest {
            url: url.to_string(),
            formats: vec!["markdown".to_string()],
            only_main_content: true,
        };

        let response = self
            .client
            .post(format!("{}/scrape", FIRECRAWL_API_URL))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Provider {
                provider: "firecrawl",
                message: format!("Firecrawl API error {}: {}", status, body),
            });
        }

        let scrape: ScrapeResponse = response.json().await?;

        let data = match scrape {
            ScrapeResponse {
                success: true,
                data: Some(data),
            } => data,
            _ => {
                return Err(DiscoveryError::Provider {
                    provider: "firecrawl",
                    message: "Firecrawl scrape unsuccessful".to_string(),
                })
            }
        };

        let markdown = data.markdown.ok_or_else(|| DiscoveryError::Provider {
            provider: "firecrawl",
            message: "no markdown content returned".to_string(),
        })?;

        let source_url = data
            .metadata
            .and_then(|m| m.source_url)
            .unwrap_or_else(|| url.to_string());

        Ok((markdown, source_url))
    }

    fn build_prompt(url: &str, markdown: &str) -> String {
        let content = truncate(markdown, MAX_PAGE_CHARS);

        format!(
            "The following is the main content of a product page at {url}.\n\n\
             ---\n{content}\n---\n\n\
             Extract the product's metadata. Respond with a JSON object:\n\
             {{\n\
             \x20 \"name\": string,\n\
             \x20 \"price\": {{\"amount\": number or null, \"currency\": ISO-4217 code or null}},\n\
             \x20 \"image_urls\": [string, ...] (primary image first, empty if none),\n\
             \x20 \"description\": string (short, may be empty),\n\
             \x20 \"availability\": string or null,\n\
             \x20 \"brand\": string or null,\n\
             \x20 \"rating\": number or null,\n\
             \x20 \"review_count\": number or null\n\
             }}\n\n\
             Use only information present on the page. Use null for anything \
             the page does not state."
        )
    }
}

#[async_trait]
impl MetadataProvider for FirecrawlProvider {
    fn name(&self) -> &'static str {
        "firecrawl"
    }

    async fn extract(&self, url: &str) -> Result<ProductRecord> {
        let (markdown, source_url) = self.scrape(url).await?;

        let prompt = Self::build_prompt(url, &markdown);
        let response = self
            .completion
            .complete(&prompt, CompletionOptions::json(0.0))
            .await?;

        let extracted: ExtractedProduct = serde_json::from_str(strip_code_fences(&response))?;

        let price = extracted
            .price
            .map(|p| Price {
                amount: p.amount,
                currency: p.currency,
            })
            .unwrap_or_default();

        Ok(ProductRecord {
            name: extracted
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
            price,
            image_urls: extracted.image_urls,
            description: extracted.description.unwrap_or_default(),
            product_url: source_url,
            availability: extracted.availability,
            brand: extracted.brand,
            rating: extracted.rating,
            review_count: extracted.review_count,
            provider_id: None,
            extraction_error: None,
        })
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        &s[..end]
    }
}
