//! Metadata orchestrator: URL-routed or all-parallel extraction dispatch.

use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::traits::MetadataProvider;
use crate::types::{ProductRecord, ProviderResult};

/// How extraction is dispatched across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Exactly one provider per URL, chosen by its `accepts` predicate.
    /// Production traffic.
    Routed,
    /// Every provider runs on every URL; results tagged for offline
    /// comparison of provider quality. Evaluation only.
    FanOut,
}

enum Dispatch {
    Routed { default: Arc<dyn MetadataProvider> },
    FanOut,
}

/// Dispatches metadata extraction to the configured providers.
///
/// Never returns an error: every provider fault is caught per-URL and
/// surfaced as an error-sentinel [`ProductRecord`], so one URL's failure
/// cannot abort a batch.
pub struct MetadataOrchestrator {
    providers: Vec<Arc<dyn MetadataProvider>>,
    dispatch: Dispatch,
}

impl MetadataOrchestrator {
    /// Routed mode: the first provider whose `accepts` matches wins; URLs
    /// nobody claims go to `default`.
    ///
    /// On failure the chosen provider's sentinel is returned as-is; there
    /// is no automatic fallback to another provider. Predictable,
    /// provider-appropriate extraction is preferred over fail-over
    /// robustness here; resubmitting the job is the retry path.
    pub fn routed(
        providers: Vec<Arc<dyn MetadataProvider>>,
        default: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            providers,
            dispatch: Dispatch::Routed { default },
        }
    }

    /// Fan-out mode: every configured provider runs concurrently on the
    /// same URL regardless of `accepts`.
    pub fn fan_out(providers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        Self {
            providers,
            dispatch: Dispatch::FanOut,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        match self.dispatch {
            Dispatch::Routed { .. } => DispatchMode::Routed,
            Dispatch::FanOut => DispatchMode::FanOut,
        }
    }

    /// Extract metadata for one URL under the configured dispatch mode.
    ///
    /// Routed mode returns exactly one entry; fan-out mode one per
    /// provider.
    pub async fn extract(&self, url: &str) -> Vec<ProviderResult<ProductRecord>> {
        match &self.dispatch {
            Dispatch::Routed { default } => {
                let provider = self
                    .providers
                    .iter()
                    .find(|p| p.accepts(url))
                    .unwrap_or(default);
                vec![Self::extract_one(provider, url).await]
            }
            Dispatch::FanOut => {
                join_all(
                    self.providers
                        .iter()
                        .map(|provider| Self::extract_one(provider, url)),
                )
                .await
            }
        }
    }

    async fn extract_one(
        provider: &Arc<dyn MetadataProvider>,
        url: &str,
    ) -> ProviderResult<ProductRecord> {
        match provider.extract(url).await {
            Ok(record) => ProviderResult::ok(provider.name(), record),
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    url,
                    error = %e,
                    "Metadata extraction failed"
                );
                ProviderResult::failed(
                    provider.name(),
                    ProductRecord::error_sentinel(url, e.to_string()),
                    e.to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockMetadataProvider;
    use crate::types::UNKNOWN_PRODUCT_NAME;

    fn amazon_provider() -> Arc<MockMetadataProvider> {
        Arc::new(MockMetadataProvider::new("marketplace").accepting("amazon.com"))
    }

    #[tokio::test]
    async fn test_routed_picks_first_accepting_provider() {
        let marketplace = amazon_provider();
        let general = Arc::new(MockMetadataProvider::new("general"));

        let orchestrator = MetadataOrchestrator::routed(
            vec![marketplace.clone() as Arc<dyn MetadataProvider>],
            general.clone() as Arc<dyn MetadataProvider>,
        );

        let results = orchestrator
            .extract("https://www.amazon.com/dp/B0B9HZD3ZR")
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].provider, "marketplace");
        assert_eq!(marketplace.call_count(), 1);
        assert_eq!(general.call_count(), 0);
    }

    #[tokio::test]
    async fn test_routed_falls_back_to_default_for_unclaimed_urls() {
        let marketplace = amazon_provider();
        let general = Arc::new(MockMetadataProvider::new("general"));

        let orchestrator = MetadataOrchestrator::routed(
            vec![marketplace.clone() as Arc<dyn MetadataProvider>],
            general.clone() as Arc<dyn MetadataProvider>,
        );

        let results = orchestrator.extract("https://shop.example.com/p/42").await;

        assert_eq!(results[0].provider, "general");
        assert_eq!(marketplace.call_count(), 0);
    }

    #[tokio::test]
    async fn test_routed_is_deterministic() {
        let orchestrator = MetadataOrchestrator::routed(
            vec![
                amazon_provider() as Arc<dyn MetadataProvider>,
                Arc::new(MockMetadataProvider::new("other").accepting("amazon.com")),
            ],
            Arc::new(MockMetadataProvider::new("general")),
        );

        for _ in 0..10 {
            let results = orchestrator
                .extract("https://www.amazon.com/dp/B0B9HZD3ZR")
                .await;
            assert_eq!(results[0].provider, "marketplace");
        }
    }

    #[tokio::test]
    async fn test_routed_failure_yields_sentinel_without_fallback() {
        let marketplace = Arc::new(
            MockMetadataProvider::new("marketplace")
                .accepting("amazon.com")
                .failing("upstream 500"),
        );
        let general = Arc::new(MockMetadataProvider::new("general"));

        let orchestrator = MetadataOrchestrator::routed(
            vec![marketplace as Arc<dyn MetadataProvider>],
            general.clone() as Arc<dyn MetadataProvider>,
        );

        let results = orchestrator
            .extract("https://www.amazon.com/dp/B0B9HZD3ZR")
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].provider, "marketplace");
        assert!(results[0].value.is_error());
        assert_eq!(results[0].value.name, UNKNOWN_PRODUCT_NAME);
        // No automatic fail-over to the default provider.
        assert_eq!(general.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_runs_every_provider_regardless_of_accepts() {
        let marketplace = amazon_provider();
        let general = Arc::new(MockMetadataProvider::new("general"));

        let orchestrator = MetadataOrchestrator::fan_out(vec![
            marketplace.clone() as Arc<dyn MetadataProvider>,
            general.clone() as Arc<dyn MetadataProvider>,
        ]);

        let results = orchestrator.extract("https://shop.example.com/p/42").await;

        assert_eq!(results.len(), 2);
        assert_eq!(marketplace.call_count(), 1);
        assert_eq!(general.call_count(), 1);
    }
}
