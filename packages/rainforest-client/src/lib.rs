//! Pure Rainforest REST API client.
//!
//! A minimal client for the Rainforest product-data API. Supports fetching
//! structured Amazon product data by product-page URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use rainforest_client::RainforestClient;
//!
//! let client = RainforestClient::new("your-api-key".into())?;
//!
//! let product = client
//!     .product_by_url("https://www.amazon.com/dp/B0B9HZD3ZR")
//!     .await?;
//! println!("{}", product.title.as_deref().unwrap_or("(no title)"));
//! ```

pub mod error;
pub mod types;

pub use error::{RainforestError, Result};
pub use types::{Availability, BuyboxWinner, Image, Price, Product, ProductResponse};

use std::time::Duration;

const BASE_URL: &str = "https://api.rainforestapi.com/request";

pub struct RainforestClient {
    client: reqwest::Client,
    api_key: String,
}

impl RainforestClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, api_key })
    }

    /// Fetch structured product data for an Amazon product-page URL.
    ///
    /// Rainforest resolves shortened and localized URLs itself, so the URL
    /// is passed through verbatim.
    pub async fn product_by_url(&self, url: &str) -> Result<Product> {
        tracing::info!(url, "Fetching Amazon product data from Rainforest");

        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("type", "product"),
                ("url", url),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RainforestError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: ProductResponse = resp.json().await?;

        if !envelope.request_info.success {
            let message = envelope
                .request_info
                .message
                .unwrap_or_else(|| "unspecified failure".to_string());
            return Err(RainforestError::Rejected(message));
        }

        let product = envelope.product.ok_or(RainforestError::MissingProduct)?;

        tracing::info!(
            asin = product.asin.as_deref().unwrap_or("unknown"),
            "Fetched product data"
        );

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_response_parses_buybox_price() {
        let json = r#"{
            "request_info": { "success": true },
            "product": {
                "title": "Theragun Mini",
                "asin": "B086Z6ZMXY",
                "link": "https://www.amazon.com/dp/B086Z6ZMXY",
                "brand": "Therabody",
                "rating": 4.7,
                "ratings_total": 9321,
                "main_image": { "link": "https://m.media-amazon.com/1.jpg" },
                "images": [{ "link": "https://m.media-amazon.com/2.jpg" }],
                "buybox_winner": {
                    "price": { "value": 199.00, "currency": "USD" }
                }
            }
        }"#;

        let envelope: ProductResponse = serde_json::from_str(json).unwrap();
        let product = envelope.product.unwrap();
        let price = product.buybox_winner.unwrap().price.unwrap();

        assert_eq!(product.asin.as_deref(), Some("B086Z6ZMXY"));
        assert_eq!(price.currency.as_deref(), Some("USD"));
        assert_eq!(price.value.unwrap(), rust_decimal::Decimal::from(199));
    }

    #[test]
    fn test_rejected_request_surfaces_message() {
        let json = r#"{
            "request_info": { "success": false, "message": "invalid api key" }
        }"#;

        let envelope: ProductResponse = serde_json::from_str(json).unwrap();
        assert!(!envelope.request_info.success);
        assert_eq!(envelope.request_info.message.as_deref(), Some("invalid api key"));
    }
}
