//! Gift Product Discovery Library
//!
//! Discovers purchasable products matching a natural-language gift
//! category and tracks the long-running work as background jobs.
//!
//! One job runs five stages: extract concrete product names from search
//! results, fan each name out across search providers, rank the pooled
//! hits for purchase-worthiness, extract structured metadata per selected
//! URL (routed to the provider that fits the URL), and persist what
//! survived. Submission returns a job handle immediately; callers poll the
//! registry for progress and the terminal result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use discovery::{
//!     DiscoveryConfig, DiscoveryPipeline, DiscoveryRequest, JobRegistry,
//!     MetadataOrchestrator,
//! };
//!
//! let registry = Arc::new(JobRegistry::new());
//! let config = DiscoveryConfig::default();
//! registry.spawn_reaper(config.reaper_interval, config.job_retention);
//!
//! let pipeline = DiscoveryPipeline::new(
//!     registry.clone(),
//!     searchers,
//!     MetadataOrchestrator::routed(vec![rainforest], firecrawl),
//!     completion,
//!     store,
//!     notifier,
//!     config,
//! );
//!
//! let job_id = pipeline.submit(DiscoveryRequest { owner_id, category_id, count: 3 });
//! // ... poll ...
//! let job = pipeline.job(job_id);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability boundaries (search, metadata, completion, store, notifier)
//! - [`types`] - Domain types (jobs, hits, product records)
//! - [`pipeline`] - Orchestrators and the job body
//! - [`jobs`] - In-memory job registry with background reaper
//! - [`searchers`] / [`extractors`] / [`ai`] / [`notifiers`] - Concrete backends
//! - [`stores`] - Storage implementations
//! - [`testing`] - Mock implementations for tests

pub mod ai;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod notifiers;
pub mod pipeline;
pub mod searchers;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::DiscoveryConfig;
pub use error::{DiscoveryError, Result};
pub use jobs::JobRegistry;
pub use traits::{
    CatalogStore, Completion, CompletionOptions, DiscoveryNotice, GiftCategory, MetadataProvider,
    NewProduct, Notifier, ResponseFormat, SearchProvider, StoredProduct,
};
pub use types::{
    CandidateHit, Job, JobId, JobStatus, JobUpdate, Price, ProductRecord, ProviderResult,
    SearchHit, UNKNOWN_PRODUCT_NAME,
};

// Re-export pipeline components
pub use pipeline::{
    extract_product_names, fan_out_search, select_purchase_urls, DiscoveryPipeline,
    DiscoveryRequest, DiscoverySummary, DispatchMode, MetadataOrchestrator,
};

// Re-export concrete backends
pub use ai::OpenAiCompletion;
pub use extractors::{FirecrawlProvider, RainforestProvider};
pub use notifiers::{ExpoNotifier, NoopNotifier};
pub use searchers::{SerpApiProvider, TavilyProvider};
pub use stores::MemoryStore;
