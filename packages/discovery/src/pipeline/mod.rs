//! Pipeline steps and their orchestration.

pub mod discover;
pub mod metadata;
pub mod names;
pub mod prompts;
pub mod search;
pub mod selection;

pub use discover::{DiscoveryPipeline, DiscoveryRequest, DiscoverySummary};
pub use metadata::{DispatchMode, MetadataOrchestrator};
pub use names::extract_product_names;
pub use search::fan_out_search;
pub use selection::select_purchase_urls;
