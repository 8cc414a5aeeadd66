//! Integration tests for the discovery pipeline.
//!
//! Each test wires the pipeline from mocks, submits a job, and polls the
//! registry to a terminal state, the same way a caller drives the real
//! thing.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use discovery::testing::{
    MockCatalogStore, MockCompletion, MockMetadataProvider, MockNotifier, MockSearchProvider,
};
use discovery::{
    CatalogStore, Completion, DiscoveryConfig, DiscoveryPipeline, DiscoveryRequest, Job,
    JobRegistry, JobStatus, MemoryStore, MetadataOrchestrator, MetadataProvider, Notifier,
    SearchHit, SearchProvider,
};

const FITBIT_URL: &str = "https://www.amazon.com/dp/B0CC644KMJ";
const THERAGUN_URL: &str = "https://www.bestbuy.com/site/theragun-mini";
const FLASK_URL: &str = "https://www.hydroflask.com/32-oz-wide-mouth";

/// Searcher with editorial hits for the category queries and one purchase
/// hit per product name.
fn searcher_with_full_coverage() -> Arc<MockSearchProvider> {
    Arc::new(
        MockSearchProvider::new("tavily")
            .with_results(
                "fitness gear",
                vec![
                    SearchHit::new(
                        "Best fitness gear 2026: Fitbit Charge 6, Theragun Mini",
                        "https://guide.example.com/fitness-gear",
                    )
                    .with_snippet("Our favorites: Fitbit Charge 6, Theragun Mini, Hydro Flask 32oz"),
                    SearchHit::new(
                        "Hydro Flask 32oz long-term review",
                        "https://guide.example.com/hydro-flask",
                    ),
                ],
            )
            .with_results(
                "Fitbit Charge 6",
                vec![
                    SearchHit::new("Fitbit Charge 6 review", "https://reviews.example.com/fitbit"),
                    SearchHit::new("Fitbit Charge 6", FITBIT_URL),
                ],
            )
            .with_results(
                "Theragun Mini",
                vec![SearchHit::new("Theragun Mini - Best Buy", THERAGUN_URL)],
            )
            .with_results(
                "Hydro Flask 32oz",
                vec![SearchHit::new("Hydro Flask 32 oz Wide Mouth", FLASK_URL)],
            ),
    )
}

fn names_response() -> &'static str {
    r#"{"products": ["Fitbit Charge 6", "Theragun Mini", "Hydro Flask 32oz"]}"#
}

/// Pool order: fitbit-review, fitbit-amazon, theragun, flask. Skip the
/// review page.
fn selection_response() -> &'static str {
    r#"{"selections": [1, 2, 3]}"#
}

struct Harness {
    pipeline: DiscoveryPipeline,
    owner_id: Uuid,
}

fn build_pipeline(
    searchers: Vec<Arc<dyn SearchProvider>>,
    metadata: MetadataOrchestrator,
    completion: Arc<dyn Completion>,
    store: Arc<dyn CatalogStore>,
    notifier: Arc<dyn Notifier>,
) -> Harness {
    Harness {
        pipeline: DiscoveryPipeline::new(
            Arc::new(JobRegistry::new()),
            searchers,
            metadata,
            completion,
            store,
            notifier,
            DiscoveryConfig::default(),
        ),
        owner_id: Uuid::now_v7(),
    }
}

async fn await_terminal(pipeline: &DiscoveryPipeline, job_id: Uuid) -> Job {
    for _ in 0..500 {
        if let Some(job) = pipeline.job(job_id) {
            if job.status.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job did not reach a terminal state in time");
}

#[tokio::test]
async fn test_end_to_end_discovery_completes_with_all_products() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(
        MockCompletion::new()
            .with_response(names_response())
            .with_response(selection_response()),
    );
    let notifier = Arc::new(MockNotifier::new());

    let metadata = MetadataOrchestrator::routed(
        vec![Arc::new(MockMetadataProvider::new("marketplace").accepting("amazon.com"))
            as Arc<dyn MetadataProvider>],
        Arc::new(MockMetadataProvider::new("general")),
    );

    let harness = build_pipeline(
        vec![searcher_with_full_coverage()],
        metadata,
        completion.clone(),
        store.clone(),
        notifier.clone(),
    );
    let category_id = store.insert_category(harness.owner_id, "fitness gear");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());

    let result = job.result.expect("completed job carries a result");
    assert_eq!(result["count"], 3);
    assert_eq!(result["category"], "fitness gear");
    assert_eq!(result["product_ids"].as_array().unwrap().len(), 3);

    // Rows visible through the persistence collaborator.
    let rows = store.products_for_category(category_id);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|r| r.provider == "marketplace"));
    assert!(rows.iter().any(|r| r.provider == "general"));

    // Best-effort notification went out once.
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, harness.owner_id);
    assert_eq!(sent[0].1.category, "fitness gear");
    assert_eq!(sent[0].1.result_count, 3);
}

#[tokio::test]
async fn test_partial_extraction_failure_still_completes() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(
        MockCompletion::new()
            .with_response(names_response())
            .with_response(selection_response()),
    );

    // The provider claiming Best Buy URLs is down; the other two URLs
    // extract fine.
    let metadata = MetadataOrchestrator::routed(
        vec![
            Arc::new(MockMetadataProvider::new("marketplace").accepting("amazon.com"))
                as Arc<dyn MetadataProvider>,
            Arc::new(
                MockMetadataProvider::new("bigbox")
                    .accepting("bestbuy.com")
                    .failing("upstream 503"),
            ),
        ],
        Arc::new(MockMetadataProvider::new("general")),
    );

    let harness = build_pipeline(
        vec![searcher_with_full_coverage()],
        metadata,
        completion,
        store.clone(),
        Arc::new(MockNotifier::new()),
    );
    let category_id = store.insert_category(harness.owner_id, "fitness gear");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    // Partial success is not a job failure; only total failure is.
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result.unwrap()["count"], 2);
    assert_eq!(store.products_for_category(category_id).len(), 2);
}

#[tokio::test]
async fn test_all_extractions_failing_fails_the_job() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(MockCompletion::new().with_response(names_response()));

    let metadata = MetadataOrchestrator::routed(
        vec![],
        Arc::new(MockMetadataProvider::new("general").failing("blocked")),
    );

    let harness = build_pipeline(
        vec![searcher_with_full_coverage()],
        metadata,
        completion,
        store.clone(),
        Arc::new(MockNotifier::new()),
    );
    let category_id = store.insert_category(harness.owner_id, "fitness gear");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.error.as_deref(),
        Some("could not extract metadata for any product")
    );
    // Zero rows persisted.
    assert_eq!(store.product_count(), 0);
}

#[tokio::test]
async fn test_unknown_category_fails_without_searching() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(MockCompletion::new());
    let searcher = searcher_with_full_coverage();

    let harness = build_pipeline(
        vec![searcher.clone()],
        MetadataOrchestrator::routed(vec![], Arc::new(MockMetadataProvider::new("general"))),
        completion.clone(),
        store,
        Arc::new(MockNotifier::new()),
    );

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id: Uuid::now_v7(),
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("not found"));
    assert_eq!(searcher.call_count(), 0);
    assert_eq!(completion.call_count(), 0);
}

#[tokio::test]
async fn test_empty_search_pool_fails_without_completion_call() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(MockCompletion::new());

    let harness = build_pipeline(
        vec![Arc::new(MockSearchProvider::new("tavily"))],
        MetadataOrchestrator::routed(vec![], Arc::new(MockMetadataProvider::new("general"))),
        completion.clone(),
        store.clone(),
        Arc::new(MockNotifier::new()),
    );
    let category_id = store.insert_category(harness.owner_id, "obscure category");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("no products found"));
    assert_eq!(completion.call_count(), 0);
}

#[tokio::test]
async fn test_store_insert_failure_fails_the_job() {
    let store = Arc::new(MockCatalogStore::new().failing_inserts("connection reset"));
    let completion = Arc::new(
        MockCompletion::new()
            .with_response(names_response())
            .with_response(selection_response()),
    );

    let harness = build_pipeline(
        vec![searcher_with_full_coverage()],
        MetadataOrchestrator::routed(vec![], Arc::new(MockMetadataProvider::new("general"))),
        completion,
        store.clone(),
        Arc::new(MockNotifier::new()),
    );
    let category_id = store.insert_category(harness.owner_id, "fitness gear");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("connection reset"));
    assert_eq!(store.insert_count(), 0);
}

#[tokio::test]
async fn test_notification_failure_leaves_job_completed() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(
        MockCompletion::new()
            .with_response(names_response())
            .with_response(selection_response()),
    );

    let harness = build_pipeline(
        vec![searcher_with_full_coverage()],
        MetadataOrchestrator::routed(vec![], Arc::new(MockMetadataProvider::new("general"))),
        completion,
        store.clone(),
        Arc::new(MockNotifier::new().failing("push service down")),
    );
    let category_id = store.insert_category(harness.owner_id, "fitness gear");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());
    assert_eq!(store.products_for_category(category_id).len(), 3);
}

#[tokio::test]
async fn test_fan_out_mode_persists_attributed_results_per_provider() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(MockCompletion::new().with_response(names_response()));

    // Evaluation setup: every provider runs on every URL.
    let metadata = MetadataOrchestrator::fan_out(vec![
        Arc::new(MockMetadataProvider::new("marketplace")) as Arc<dyn MetadataProvider>,
        Arc::new(MockMetadataProvider::new("general")),
    ]);

    let harness = build_pipeline(
        vec![searcher_with_full_coverage()],
        metadata,
        completion,
        store.clone(),
        Arc::new(MockNotifier::new()),
    );
    let category_id = store.insert_category(harness.owner_id, "fitness gear");

    let job_id = harness.pipeline.submit(DiscoveryRequest {
        owner_id: harness.owner_id,
        category_id,
        count: 3,
    });

    let job = await_terminal(&harness.pipeline, job_id).await;

    assert_eq!(job.status, JobStatus::Completed);

    let rows = store.products_for_category(category_id);
    let marketplace_rows = rows.iter().filter(|r| r.provider == "marketplace").count();
    let general_rows = rows.iter().filter(|r| r.provider == "general").count();
    assert_eq!(marketplace_rows, general_rows);
    assert!(marketplace_rows > 0);
}
