//! Search orchestrator: concurrent fan-out across search providers.

use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::traits::SearchProvider;
use crate::types::{ProviderResult, SearchHit};

/// Fan a query out to every configured provider concurrently and wait for
/// all of them to settle.
///
/// Returns one entry per provider, tagged with its source. A provider that
/// fails yields an empty hit list plus an error marker; it never blocks or
/// poisons its siblings' results.
///
/// No total timeout is enforced at this layer; individual providers own
/// their own timeouts. A hung provider with no timeout of its own hangs
/// the fan-out; that is a documented limitation of this design.
pub async fn fan_out_search(
    query: &str,
    providers: &[Arc<dyn SearchProvider>],
) -> Vec<ProviderResult<Vec<SearchHit>>> {
    let futures = providers.iter().map(|provider| async move {
        match provider.search(query).await {
            Ok(hits) => ProviderResult::ok(provider.name(), hits),
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    query,
                    error = %e,
                    "Search provider failed"
                );
                ProviderResult::failed(provider.name(), Vec::new(), e.to_string())
            }
        }
    });

    join_all(futures).await
}
