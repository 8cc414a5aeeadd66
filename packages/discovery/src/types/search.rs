//! Search hit types shared by all search backends.

use serde::{Deserialize, Serialize};

/// A candidate purchase location surfaced by a search provider.
///
/// No uniqueness is enforced at this layer; duplicate URLs across providers
/// are expected and left to the selection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,

    /// Snippet/excerpt from the search results, when the backend provides
    /// one. Fed to the name-extraction prompt.
    #[serde(default)]
    pub snippet: Option<String>,

    #[serde(default)]
    pub published_date: Option<String>,

    #[serde(default)]
    pub author: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
            published_date: None,
            author: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_published_date(mut self, date: impl Into<String>) -> Self {
        self.published_date = Some(date.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// A search hit annotated with the product name it was found for.
///
/// The annotation survives pooling across names and providers so the
/// selection step can prefer distinct products.
#[derive(Debug, Clone)]
pub struct CandidateHit {
    pub product_name: String,
    pub hit: SearchHit,
}

impl CandidateHit {
    pub fn new(product_name: impl Into<String>, hit: SearchHit) -> Self {
        Self {
            product_name: product_name.into(),
            hit,
        }
    }
}
