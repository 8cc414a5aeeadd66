//! Normalized product metadata, provider-agnostic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name used when extraction failed completely. `ProductRecord::name` is
/// never null.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

/// Price with independently-optional amount and ISO-4217 currency.
///
/// A provider may know the currency without the amount or vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

impl Price {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            currency: Some(currency.into()),
        }
    }

    /// No price information at all.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Normalized product metadata regardless of origin provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name. Falls back to [`UNKNOWN_PRODUCT_NAME`] on total
    /// extraction failure.
    pub name: String,

    pub price: Price,

    /// Ordered image URLs, primary first. Possibly empty.
    #[serde(default)]
    pub image_urls: Vec<String>,

    /// Possibly empty, never null.
    #[serde(default)]
    pub description: String,

    /// Canonical URL actually used for extraction. May differ from the
    /// input URL if the provider resolves redirects.
    pub product_url: String,

    #[serde(default)]
    pub availability: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: Option<u64>,

    /// Provider-specific identifier (e.g. ASIN).
    #[serde(default)]
    pub provider_id: Option<String>,

    /// Present when this record is an error sentinel rather than real
    /// data. Lets callers distinguish "no data" from "crashed".
    #[serde(default)]
    pub extraction_error: Option<String>,
}

impl ProductRecord {
    /// A record with only a name and the URL it came from.
    pub fn new(name: impl Into<String>, product_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Price::unknown(),
            image_urls: Vec::new(),
            description: String::new(),
            product_url: product_url.into(),
            availability: None,
            brand: None,
            rating: None,
            review_count: None,
            provider_id: None,
            extraction_error: None,
        }
    }

    /// Error-sentinel record for a URL whose extraction failed.
    pub fn error_sentinel(url: impl Into<String>, message: impl Into<String>) -> Self {
        let mut record = Self::new(UNKNOWN_PRODUCT_NAME, url);
        record.extraction_error = Some(message.into());
        record
    }

    /// Whether this record is an error sentinel.
    pub fn is_error(&self) -> bool {
        self.extraction_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_sentinel_keeps_url_and_flags_error() {
        let record = ProductRecord::error_sentinel("https://example.com/p/1", "timed out");

        assert!(record.is_error());
        assert_eq!(record.name, UNKNOWN_PRODUCT_NAME);
        assert_eq!(record.product_url, "https://example.com/p/1");
        assert_eq!(record.extraction_error.as_deref(), Some("timed out"));
    }

    #[test]
    fn test_price_fields_are_independent() {
        let currency_only = Price {
            amount: None,
            currency: Some("EUR".to_string()),
        };
        assert!(currency_only.amount.is_none());
        assert_eq!(currency_only.currency.as_deref(), Some("EUR"));
    }
}
