//! Mock implementations for testing.
//!
//! Every capability trait has a mock here with queued/mapped responses,
//! failure injection, and call recording, so pipeline behavior can be
//! asserted without network access.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{DiscoveryError, Result};
use crate::traits::{
    CatalogStore, Completion, CompletionOptions, DiscoveryNotice, GiftCategory, MetadataProvider,
    NewProduct, Notifier, SearchProvider, StoredProduct,
};
use crate::types::{ProductRecord, SearchHit};

// =============================================================================
// Mock Search Provider
// =============================================================================

pub struct MockSearchProvider {
    name: &'static str,
    by_query: Mutex<HashMap<String, Vec<SearchHit>>>,
    default: Mutex<Vec<SearchHit>>,
    fail_with: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockSearchProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            by_query: Mutex::new(HashMap::new()),
            default: Mutex::new(Vec::new()),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hits returned for an exact query.
    pub fn with_results(self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.by_query.lock().unwrap().insert(query.to_string(), hits);
        self
    }

    /// Hits returned for any query without an exact match.
    pub fn with_default(self, hits: Vec<SearchHit>) -> Self {
        *self.default.lock().unwrap() = hits;
        self
    }

    /// Make every call fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// All queries that were searched.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.calls.lock().unwrap().push(query.to_string());

        if let Some(message) = &self.fail_with {
            return Err(DiscoveryError::Provider {
                provider: self.name,
                message: message.clone(),
            });
        }

        if let Some(hits) = self.by_query.lock().unwrap().get(query) {
            return Ok(hits.clone());
        }
        Ok(self.default.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Metadata Provider
// =============================================================================

pub struct MockMetadataProvider {
    name: &'static str,
    accepts_substring: Option<String>,
    records: Mutex<HashMap<String, ProductRecord>>,
    fail_with: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockMetadataProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            accepts_substring: None,
            records: Mutex::new(HashMap::new()),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Restrict `accepts` to URLs containing the given substring. Without
    /// this, the mock accepts everything.
    pub fn accepting(mut self, substring: impl Into<String>) -> Self {
        self.accepts_substring = Some(substring.into());
        self
    }

    /// Record returned for an exact URL. URLs without one get a generic
    /// mock record.
    pub fn with_record(self, url: &str, record: ProductRecord) -> Self {
        self.records.lock().unwrap().insert(url.to_string(), record);
        self
    }

    /// Make every call fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// All URLs that were extracted.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, url: &str) -> bool {
        match &self.accepts_substring {
            Some(substring) => url.contains(substring.as_str()),
            None => true,
        }
    }

    async fn extract(&self, url: &str) -> Result<ProductRecord> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(message) = &self.fail_with {
            return Err(DiscoveryError::Provider {
                provider: self.name,
                message: message.clone(),
            });
        }

        if let Some(record) = self.records.lock().unwrap().get(url) {
            return Ok(record.clone());
        }
        Ok(ProductRecord::new("Mock product", url))
    }
}

// =============================================================================
// Mock Completion
// =============================================================================

pub struct MockCompletion {
    responses: Mutex<Vec<String>>,
    fail_with: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a raw response. Responses are consumed in order; an empty
    /// queue yields `"{}"`.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Queue a response serialized from a value.
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("failed to serialize mock response");
        self.with_response(json)
    }

    /// Make every call fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// All prompts that were sent.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Whether any prompt contained the given text.
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|p| p.contains(text))
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Completion for MockCompletion {
    async fn complete(&self, prompt: &str, _opts: CompletionOptions) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());

        if let Some(message) = &self.fail_with {
            return Err(DiscoveryError::Completion(message.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("{}".to_string())
        } else {
            Ok(responses.remove(0))
        }
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(Uuid, DiscoveryNotice)>>,
    fail_with: Option<String>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// All notifications that were sent.
    pub fn sent(&self) -> Vec<(Uuid, DiscoveryNotice)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, owner_id: Uuid, notice: &DiscoveryNotice) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(DiscoveryError::Notify(message.clone()));
        }
        self.sent.lock().unwrap().push((owner_id, notice.clone()));
        Ok(())
    }
}

// =============================================================================
// Mock Catalog Store
// =============================================================================

#[derive(Default)]
pub struct MockCatalogStore {
    categories: Mutex<HashMap<Uuid, GiftCategory>>,
    inserted: Mutex<Vec<StoredProduct>>,
    fail_inserts: Option<String>,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category, returning its id.
    pub fn insert_category(&self, owner_id: Uuid, description: impl Into<String>) -> Uuid {
        let category = GiftCategory {
            id: Uuid::now_v7(),
            owner_id,
            description: description.into(),
        };
        let id = category.id;
        self.categories.lock().unwrap().insert(id, category);
        id
    }

    /// Make every insert fail with the given message.
    pub fn failing_inserts(mut self, message: impl Into<String>) -> Self {
        self.fail_inserts = Some(message.into());
        self
    }

    /// All rows that were inserted.
    pub fn inserted(&self) -> Vec<StoredProduct> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn fetch_category(
        &self,
        category_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<GiftCategory>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(&category_id)
            .filter(|c| c.owner_id == owner_id)
            .cloned())
    }

    async fn insert_products(
        &self,
        category_id: Uuid,
        products: Vec<NewProduct>,
    ) -> Result<Vec<StoredProduct>> {
        if let Some(message) = &self.fail_inserts {
            return Err(DiscoveryError::Storage(message.clone().into()));
        }

        let now = Utc::now();
        let rows: Vec<StoredProduct> = products
            .into_iter()
            .map(|p| StoredProduct {
                id: Uuid::now_v7(),
                category_id,
                provider: p.provider,
                record: p.record,
                created_at: now,
            })
            .collect();

        self.inserted.lock().unwrap().extend(rows.clone());
        Ok(rows)
    }
}
