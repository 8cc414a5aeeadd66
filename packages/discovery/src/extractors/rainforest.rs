//! Rainforest metadata backend for Amazon product pages.
//!
//! Marketplace-specific: only functions for Amazon URL families, and says
//! so through [`accepts`](crate::traits::MetadataProvider::accepts).

use async_trait::async_trait;
use rainforest_client::RainforestClient;
use url::Url;

use crate::error::{DiscoveryError, Result};
use crate::traits::MetadataProvider;
use crate::types::{Price, ProductRecord, UNKNOWN_PRODUCT_NAME};

/// Amazon product metadata via the Rainforest API.
pub struct RainforestProvider {
    client: RainforestClient,
}

impl RainforestProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = RainforestClient::new(api_key.into()).map_err(|e| {
            DiscoveryError::Config(format!("failed to create Rainforest client: {}", e))
        })?;
        Ok(Self { client })
    }

    /// Create from the `RAINFOREST_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("RAINFOREST_API_KEY")
            .map_err(|_| DiscoveryError::Config("RAINFOREST_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    fn is_amazon_host(host: &str) -> bool {
        let host = host.strip_prefix("www.").unwrap_or(host);
        host == "amzn.to"
            || host == "a.co"
            || host.starts_with("amazon.")
            || host.starts_with("smile.amazon.")
    }
}

#[async_trait]
impl MetadataProvider for RainforestProvider {
    fn name(&self) -> &'static str {
        "rainforest"
    }

    fn accepts(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(Self::is_amazon_host))
            .unwrap_or(false)
    }

    async fn extract(&self, url: &str) -> Result<ProductRecord> {
        let product = self
            .client
            .product_by_url(url)
            .await
            .map_err(|e| DiscoveryError::Provider {
                provider: "rainforest",
                message: e.to_string(),
            })?;

        let price = product
            .buybox_winner
            .and_then(|b| b.price)
            .map(|p| Price {
                amount: p.value,
                currency: p.currency,
            })
            .unwrap_or_default();

        // Primary image first, then the gallery minus any repeat of it.
        let main_link = product.main_image.map(|i| i.link);
        let mut image_urls: Vec<String> = main_link.clone().into_iter().collect();
        image_urls.extend(
            product
                .images
                .into_iter()
                .map(|i| i.link)
                .filter(|l| Some(l) != main_link.as_ref()),
        );

        Ok(ProductRecord {
            name: product
                .title
                .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
            price,
            image_urls,
            description: product.description.unwrap_or_default(),
            product_url: product.link.unwrap_or_else(|| url.to_string()),
            availability: product.availability.and_then(|a| a.raw),
            brand: product.brand,
            rating: product.rating,
            review_count: product.ratings_total,
            provider_id: product.asin,
            extraction_error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_amazon_url_families() {
        assert!(RainforestProvider::is_amazon_host("www.amazon.com"));
        assert!(RainforestProvider::is_amazon_host("amazon.co.uk"));
        assert!(RainforestProvider::is_amazon_host("smile.amazon.com"));
        assert!(RainforestProvider::is_amazon_host("amzn.to"));
        assert!(RainforestProvider::is_amazon_host("a.co"));

        assert!(!RainforestProvider::is_amazon_host("www.bestbuy.com"));
        assert!(!RainforestProvider::is_amazon_host("amazonbasics.example.com"));
        assert!(!RainforestProvider::is_amazon_host("notamazon.com"));
    }
}
