//! Metadata provider trait for structured product extraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ProductRecord;

/// A product-metadata backend.
///
/// Given a purchase-page URL, returns a normalized [`ProductRecord`].
/// Marketplace-specific backends only function for a recognizable URL
/// family and self-report via [`accepts`](MetadataProvider::accepts);
/// general backends keep the default (accept everything).
///
/// # Implementations
///
/// - [`RainforestProvider`](crate::extractors::RainforestProvider):
///   Amazon URLs only
/// - [`FirecrawlProvider`](crate::extractors::FirecrawlProvider): any URL
/// - [`MockMetadataProvider`](crate::testing::MockMetadataProvider)
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Stable identifier used to tag results and log failures.
    fn name(&self) -> &'static str;

    /// Whether this backend can handle the given URL.
    fn accepts(&self, _url: &str) -> bool {
        true
    }

    /// Extract structured product metadata from a purchase page.
    async fn extract(&self, url: &str) -> Result<ProductRecord>;
}
