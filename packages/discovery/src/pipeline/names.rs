//! Product name extraction: fuzzy category to concrete product names.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::pipeline::prompts::build_name_extraction_prompt;
use crate::pipeline::search::fan_out_search;
use crate::traits::completion::{strip_code_fences, Completion, CompletionOptions};
use crate::traits::SearchProvider;
use crate::types::SearchHit;

#[derive(Debug, Deserialize)]
struct NamesResponse {
    products: Vec<String>,
}

/// Turn a gift category into up to `count` concrete product names.
///
/// Issues diversified queries through the search orchestrator to build an
/// oversampled pool of hits, then asks the completion capability for
/// product names literally present in that pool. An empty pool returns an
/// empty list without invoking the completion capability at all; there is
/// nothing to ground names in, and completion behavior on empty input is
/// undefined.
///
/// Returns fewer than `count` names when fewer are grounded; no padding.
pub async fn extract_product_names(
    category: &str,
    count: usize,
    providers: &[Arc<dyn SearchProvider>],
    completion: &Arc<dyn Completion>,
    config: &DiscoveryConfig,
) -> Result<Vec<String>> {
    let queries = [
        category.to_string(),
        format!("best {}", category),
        format!("top {} to buy", category),
    ];

    let fan_outs = join_all(queries.iter().map(|q| fan_out_search(q, providers))).await;

    // Pool hits across queries and providers, dropping duplicate URLs, and
    // oversample relative to the requested count.
    let mut seen_urls = HashSet::new();
    let mut pool: Vec<SearchHit> = fan_outs
        .into_iter()
        .flatten()
        .flat_map(|r| r.value)
        .filter(|hit| seen_urls.insert(hit.url.clone()))
        .collect();
    pool.truncate(config.oversample_factor * count.max(1));

    if pool.is_empty() {
        info!(category, "Search pool empty, skipping name extraction");
        return Ok(vec![]);
    }

    debug!(category, pool_size = pool.len(), "Extracting product names");

    let prompt = build_name_extraction_prompt(category, count, &pool);
    let response = completion
        .complete(&prompt, CompletionOptions::json(config.temperature))
        .await?;

    let parsed: NamesResponse = serde_json::from_str(strip_code_fences(&response))?;

    let names: Vec<String> = parsed
        .products
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .take(count)
        .collect();

    info!(category, names = names.len(), "Extracted product names");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCompletion, MockSearchProvider};
    use crate::traits::Completion;

    fn pooled_provider() -> Arc<dyn SearchProvider> {
        Arc::new(MockSearchProvider::new("tavily").with_default(vec![
            SearchHit::new(
                "Best fitness gear 2024: Fitbit Charge 6",
                "https://guide.example.com/fitness",
            )
            .with_snippet("Our picks: Fitbit Charge 6, Theragun Mini"),
            SearchHit::new("Theragun Mini on sale", "https://shop.example.com/theragun"),
        ]))
    }

    #[tokio::test]
    async fn test_empty_pool_skips_completion_entirely() {
        let providers: Vec<Arc<dyn SearchProvider>> =
            vec![Arc::new(MockSearchProvider::new("tavily"))];
        let completion = Arc::new(MockCompletion::new());
        let completion_dyn: Arc<dyn Completion> = completion.clone();

        let names = extract_product_names(
            "fitness gear",
            3,
            &providers,
            &completion_dyn,
            &DiscoveryConfig::default(),
        )
        .await
        .unwrap();

        assert!(names.is_empty());
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parses_grounded_names_from_response() {
        let providers = vec![pooled_provider()];
        let completion = Arc::new(MockCompletion::new().with_response(
            r#"{"products": ["Fitbit Charge 6", "Theragun Mini"]}"#,
        ));
        let completion_dyn: Arc<dyn Completion> = completion.clone();

        let names = extract_product_names(
            "fitness gear",
            3,
            &providers,
            &completion_dyn,
            &DiscoveryConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(names, vec!["Fitbit Charge 6", "Theragun Mini"]);
        assert!(completion.was_called_with("literally appear"));
    }

    #[tokio::test]
    async fn test_truncates_to_requested_count() {
        let providers = vec![pooled_provider()];
        let completion: Arc<dyn Completion> = Arc::new(MockCompletion::new().with_response(
            r#"{"products": ["A", "B", "C", "D"]}"#,
        ));

        let names = extract_product_names(
            "fitness gear",
            2,
            &providers,
            &completion,
            &DiscoveryConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let providers = vec![pooled_provider()];
        let completion: Arc<dyn Completion> =
            Arc::new(MockCompletion::new().with_response("not json at all"));

        let result = extract_product_names(
            "fitness gear",
            3,
            &providers,
            &completion,
            &DiscoveryConfig::default(),
        )
        .await;

        assert!(result.is_err());
    }
}
