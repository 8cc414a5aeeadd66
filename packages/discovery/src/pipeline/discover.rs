//! The discovery pipeline: orchestrator of orchestrators.
//!
//! Sequences one job: name extraction → per-name search fan-out → URL
//! selection → metadata fan-out → persistence → notification, driving the
//! owning job's registry record through `Pending → Running →
//! {Completed|Failed}`.
//!
//! Submission is fire-and-forget from the caller's viewpoint: `submit`
//! returns a job id immediately and the body runs on its own task. The
//! body task is awaited by a supervising task, so even a panic inside the
//! body is observed and lands in the job record rather than the
//! process-wide unhandled-error channel.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::jobs::JobRegistry;
use crate::pipeline::metadata::MetadataOrchestrator;
use crate::pipeline::names::extract_product_names;
use crate::pipeline::search::fan_out_search;
use crate::pipeline::selection::select_purchase_urls;
use crate::traits::{
    CatalogStore, Completion, DiscoveryNotice, NewProduct, Notifier, SearchProvider,
};
use crate::types::{CandidateHit, Job, JobId, JobStatus, JobUpdate};

/// A discovery submission.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    pub owner_id: Uuid,
    pub category_id: Uuid,
    /// How many products to discover.
    pub count: usize,
}

/// Terminal result payload of a completed discovery job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub category: String,
    pub count: usize,
    pub product_ids: Vec<Uuid>,
}

/// Drives discovery jobs end to end.
///
/// Holds the injected collaborators and spawns one task per submitted
/// job. Simultaneously running jobs are uncapped, matching the original
/// semantics; a bounded pool would slot in here.
#[derive(Clone)]
pub struct DiscoveryPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    registry: Arc<JobRegistry>,
    searchers: Vec<Arc<dyn SearchProvider>>,
    metadata: MetadataOrchestrator,
    completion: Arc<dyn Completion>,
    store: Arc<dyn CatalogStore>,
    notifier: Arc<dyn Notifier>,
    config: DiscoveryConfig,
}

impl DiscoveryPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<JobRegistry>,
        searchers: Vec<Arc<dyn SearchProvider>>,
        metadata: MetadataOrchestrator,
        completion: Arc<dyn Completion>,
        store: Arc<dyn CatalogStore>,
        notifier: Arc<dyn Notifier>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                registry,
                searchers,
                metadata,
                completion,
                store,
                notifier,
                config,
            }),
        }
    }

    /// Submit a discovery job. Returns its handle immediately; poll the
    /// registry (or [`job`](Self::job)) to observe progress.
    pub fn submit(&self, request: DiscoveryRequest) -> JobId {
        let job_id = self.inner.registry.create();
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            inner
                .registry
                .update(job_id, JobUpdate::status(JobStatus::Running));
            info!(
                %job_id,
                category_id = %request.category_id,
                count = request.count,
                "Discovery job started"
            );

            let body = tokio::spawn({
                let inner = Arc::clone(&inner);
                let request = request.clone();
                async move { inner.run(&request).await }
            });

            match body.await {
                Ok(Ok(summary)) => {
                    let result =
                        serde_json::to_value(&summary).unwrap_or(serde_json::Value::Null);
                    inner.registry.update(job_id, JobUpdate::completed(result));
                    info!(%job_id, count = summary.count, "Discovery job completed");

                    // Best-effort: a completed job stays completed no
                    // matter what happens here.
                    let notice = DiscoveryNotice {
                        category: summary.category,
                        result_count: summary.count,
                    };
                    if let Err(e) = inner.notifier.notify(request.owner_id, &notice).await {
                        warn!(%job_id, error = %e, "Notification failed");
                    }
                }
                Ok(Err(e)) => {
                    warn!(%job_id, error = %e, "Discovery job failed");
                    inner
                        .registry
                        .update(job_id, JobUpdate::failed(e.to_string()));
                }
                Err(join_err) => {
                    error!(%job_id, error = %join_err, "Discovery job body panicked");
                    inner.registry.update(
                        job_id,
                        JobUpdate::failed(format!("internal error: {}", join_err)),
                    );
                }
            }
        });

        job_id
    }

    /// Look up a job's current state.
    pub fn job(&self, id: JobId) -> Option<Job> {
        self.inner.registry.get(id)
    }

    /// The registry driving this pipeline's jobs.
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.inner.registry
    }
}

impl PipelineInner {
    async fn run(&self, request: &DiscoveryRequest) -> Result<DiscoverySummary> {
        // Ownership check first; a missing category fails the job with no
        // retry.
        let category = self
            .store
            .fetch_category(request.category_id, request.owner_id)
            .await?
            .ok_or(DiscoveryError::CategoryNotFound {
                category_id: request.category_id,
                owner_id: request.owner_id,
            })?;

        let names = extract_product_names(
            &category.description,
            request.count,
            &self.searchers,
            &self.completion,
            &self.config,
        )
        .await?;
        if names.is_empty() {
            return Err(DiscoveryError::NoProductNames);
        }

        // One search fan-out per name, all names concurrently; hits keep
        // their originating name through pooling.
        let searchers = &self.searchers;
        let per_name = join_all(names.iter().map(|name| async move {
            let results = fan_out_search(name, searchers).await;
            (name.clone(), results)
        }))
        .await;

        let mut pool = Vec::new();
        for (name, results) in per_name {
            for result in results {
                for hit in result.value {
                    pool.push(CandidateHit::new(name.clone(), hit));
                }
            }
        }
        if pool.is_empty() {
            return Err(DiscoveryError::NoSearchHits);
        }

        let selected =
            select_purchase_urls(&pool, request.count, &self.completion, &self.config).await;

        // Every URL's extraction is independently wrapped; sentinels are
        // logged and excluded from persistence rather than dropped
        // silently.
        let extractions =
            join_all(selected.iter().map(|c| self.metadata.extract(&c.hit.url))).await;

        let mut products = Vec::new();
        for result in extractions.into_iter().flatten() {
            if result.value.is_error() {
                warn!(
                    provider = result.provider,
                    url = %result.value.product_url,
                    "Excluding failed extraction from results"
                );
            } else {
                products.push(NewProduct::new(result.provider, result.value));
            }
        }
        if products.is_empty() {
            return Err(DiscoveryError::AllExtractionsFailed);
        }

        let stored = self.store.insert_products(category.id, products).await?;

        Ok(DiscoverySummary {
            category: category.description,
            count: stored.len(),
            product_ids: stored.iter().map(|p| p.id).collect(),
        })
    }
}
