//! Capability traits the pipeline is composed from.
//!
//! These are infrastructure boundaries only: search backends, metadata
//! backends, the opaque text-completion capability, the persistence
//! collaborator, and the notification collaborator. Business logic lives in
//! [`crate::pipeline`] and uses these traits.

pub mod completion;
pub mod metadata;
pub mod notifier;
pub mod search;
pub mod store;

pub use completion::{Completion, CompletionOptions, ResponseFormat};
pub use metadata::MetadataProvider;
pub use notifier::{DiscoveryNotice, Notifier};
pub use search::SearchProvider;
pub use store::{CatalogStore, GiftCategory, NewProduct, StoredProduct};
