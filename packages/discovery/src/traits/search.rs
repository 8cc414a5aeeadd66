//! Search provider trait for purchase-location discovery.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SearchHit;

/// A web-search backend.
///
/// Each implementation owns its own query-construction convention (one may
/// pass the query through verbatim, another may wrap it in a
/// purchase-intent phrase) and its own HTTP timeout. Implementations
/// return `Err` on failure; isolation across providers is the
/// orchestrator's job, not the provider's.
///
/// # Implementations
///
/// - [`TavilyProvider`](crate::searchers::TavilyProvider)
/// - [`SerpApiProvider`](crate::searchers::SerpApiProvider)
/// - [`MockSearchProvider`](crate::testing::MockSearchProvider)
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable identifier used to tag results and log failures.
    fn name(&self) -> &'static str;

    /// Search the web for candidate purchase locations.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}
