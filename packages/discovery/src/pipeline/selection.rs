//! URL selection: rank pooled hits for purchase-worthiness.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::pipeline::prompts::build_url_selection_prompt;
use crate::traits::completion::{strip_code_fences, Completion, CompletionOptions};
use crate::types::CandidateHit;

#[derive(Debug, Deserialize)]
struct SelectionResponse {
    selections: Vec<i64>,
}

/// Pick up to `count` purchase-page candidates from the pooled hits.
///
/// Most search hits are not purchase pages, so the whole pool is presented
/// to the completion capability, indexed, with instructions to pick direct
/// e-commerce pages and prefer distinct product names. Out-of-range and
/// duplicate indices are discarded.
///
/// This step never fails the job: if the ranking response is malformed (or
/// the completion call errors), it falls back deterministically to the
/// first `count` hits in input order.
pub async fn select_purchase_urls(
    pool: &[CandidateHit],
    count: usize,
    completion: &Arc<dyn Completion>,
    config: &DiscoveryConfig,
) -> Vec<CandidateHit> {
    if pool.len() <= count {
        // Nothing to rank; everything is selected.
        return pool.to_vec();
    }

    match try_select(pool, count, completion, config).await {
        Ok(selected) if !selected.is_empty() => selected,
        Ok(_) => {
            warn!("URL selection returned no usable indices, falling back to input order");
            pool.iter().take(count).cloned().collect()
        }
        Err(e) => {
            warn!(error = %e, "URL selection failed, falling back to input order");
            pool.iter().take(count).cloned().collect()
        }
    }
}

async fn try_select(
    pool: &[CandidateHit],
    count: usize,
    completion: &Arc<dyn Completion>,
    config: &DiscoveryConfig,
) -> Result<Vec<CandidateHit>> {
    let prompt = build_url_selection_prompt(pool, count);
    let response = completion
        .complete(&prompt, CompletionOptions::json(config.temperature))
        .await?;

    let parsed: SelectionResponse = serde_json::from_str(strip_code_fences(&response))?;

    let mut seen = HashSet::new();
    let selected: Vec<CandidateHit> = parsed
        .selections
        .into_iter()
        .filter_map(|i| usize::try_from(i).ok())
        .filter(|&i| i < pool.len())
        .filter(|&i| seen.insert(i))
        .take(count)
        .map(|i| pool[i].clone())
        .collect();

    debug!(
        requested = count,
        selected = selected.len(),
        "URL selection complete"
    );
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCompletion;
    use crate::types::SearchHit;

    fn pool() -> Vec<CandidateHit> {
        vec![
            CandidateHit::new(
                "Fitbit Charge 6",
                SearchHit::new("Fitbit review", "https://reviews.example.com/fitbit"),
            ),
            CandidateHit::new(
                "Fitbit Charge 6",
                SearchHit::new("Buy Fitbit Charge 6", "https://store.example.com/fitbit"),
            ),
            CandidateHit::new(
                "Theragun Mini",
                SearchHit::new("Theragun Mini", "https://store.example.com/theragun"),
            ),
            CandidateHit::new(
                "Hydro Flask 32oz",
                SearchHit::new("Hydro Flask", "https://store.example.com/flask"),
            ),
        ]
    }

    #[tokio::test]
    async fn test_selects_indices_from_response() {
        let completion: Arc<dyn Completion> = Arc::new(
            MockCompletion::new().with_response(r#"{"selections": [1, 2, 3]}"#),
        );

        let selected = select_purchase_urls(&pool(), 3, &completion, &DiscoveryConfig::default()).await;

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].hit.url, "https://store.example.com/fitbit");
        assert_eq!(selected[2].hit.url, "https://store.example.com/flask");
    }

    #[tokio::test]
    async fn test_out_of_range_and_duplicate_indices_are_discarded() {
        let completion: Arc<dyn Completion> = Arc::new(
            MockCompletion::new().with_response(r#"{"selections": [2, 2, 99, -1, 0]}"#),
        );

        let selected = select_purchase_urls(&pool(), 3, &completion, &DiscoveryConfig::default()).await;

        let urls: Vec<&str> = selected.iter().map(|c| c.hit.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://store.example.com/theragun",
                "https://reviews.example.com/fitbit"
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back_to_input_order() {
        let completion: Arc<dyn Completion> =
            Arc::new(MockCompletion::new().with_response("certainly! here are my picks: 1, 2"));

        let selected = select_purchase_urls(&pool(), 3, &completion, &DiscoveryConfig::default()).await;

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].hit.url, "https://reviews.example.com/fitbit");
        assert_eq!(selected[1].hit.url, "https://store.example.com/fitbit");
        assert_eq!(selected[2].hit.url, "https://store.example.com/theragun");
    }

    #[tokio::test]
    async fn test_completion_error_falls_back_to_input_order() {
        let completion: Arc<dyn Completion> =
            Arc::new(MockCompletion::new().failing("rate limited"));

        let selected = select_purchase_urls(&pool(), 2, &completion, &DiscoveryConfig::default()).await;

        assert_eq!(selected.len(), 2);
    }

    #[tokio::test]
    async fn test_small_pool_skips_ranking() {
        let completion = Arc::new(MockCompletion::new());
        let completion_dyn: Arc<dyn Completion> = completion.clone();
        let small: Vec<CandidateHit> = pool().into_iter().take(2).collect();

        let selected =
            select_purchase_urls(&small, 3, &completion_dyn, &DiscoveryConfig::default()).await;

        assert_eq!(selected.len(), 2);
        assert_eq!(completion.call_count(), 0);
    }
}
