//! End-to-end discovery run against live providers.
//!
//! Requires `OPENAI_API_KEY`, `TAVILY_API_KEY`, and `FIRECRAWL_API_KEY`;
//! `RAINFOREST_API_KEY` enables the Amazon-routed provider.
//!
//! ```sh
//! cargo run -p discovery --example discover_gifts
//! ```

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use discovery::{
    Completion, DiscoveryConfig, DiscoveryPipeline, DiscoveryRequest, FirecrawlProvider,
    JobRegistry, JobStatus, MemoryStore, MetadataOrchestrator, MetadataProvider, NoopNotifier,
    OpenAiCompletion, RainforestProvider, SearchProvider, TavilyProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let completion: Arc<dyn Completion> = Arc::new(OpenAiCompletion::from_env()?);

    let searchers: Vec<Arc<dyn SearchProvider>> = vec![Arc::new(TavilyProvider::from_env()?)];

    let firecrawl: Arc<dyn MetadataProvider> =
        Arc::new(FirecrawlProvider::from_env(completion.clone())?);
    let mut routed: Vec<Arc<dyn MetadataProvider>> = Vec::new();
    match RainforestProvider::from_env() {
        Ok(rainforest) => routed.push(Arc::new(rainforest)),
        Err(e) => eprintln!("Amazon routing disabled: {}", e),
    }
    let metadata = MetadataOrchestrator::routed(routed, firecrawl);

    let registry = Arc::new(JobRegistry::new());
    let config = DiscoveryConfig::default();
    registry.spawn_reaper(config.reaper_interval, config.job_retention);

    let store = Arc::new(MemoryStore::new());
    let owner_id = Uuid::now_v7();
    let category_id = store.insert_category(owner_id, "fitness gear");

    let pipeline = DiscoveryPipeline::new(
        registry,
        searchers,
        metadata,
        completion,
        store.clone(),
        Arc::new(NoopNotifier),
        config,
    );

    let job_id = pipeline.submit(DiscoveryRequest {
        owner_id,
        category_id,
        count: 3,
    });
    println!("Submitted discovery job {}", job_id);

    loop {
        tokio::time::sleep(Duration::from_secs(2)).await;

        let Some(job) = pipeline.job(job_id) else {
            println!("Job no longer tracked (reaped?)");
            break;
        };

        match job.status {
            JobStatus::Pending | JobStatus::Running => println!("... {:?}", job.status),
            JobStatus::Completed => {
                println!("Completed: {}", job.result.unwrap_or_default());
                break;
            }
            JobStatus::Failed => {
                println!("Failed: {}", job.error.as_deref().unwrap_or("unknown"));
                break;
            }
        }
    }

    for product in store.products_for_category(category_id) {
        println!(
            "- [{}] {} {} {}",
            product.provider,
            product.record.name,
            product
                .record
                .price
                .amount
                .map(|a| a.to_string())
                .unwrap_or_else(|| "?".to_string()),
            product.record.product_url,
        );
    }

    Ok(())
}
