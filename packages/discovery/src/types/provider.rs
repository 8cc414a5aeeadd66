//! Attribution wrapper for multi-provider results.

/// A result tagged with the provider that produced it.
///
/// When multiple providers run for the same input, the tag is what lets
/// callers attribute (and compare) each provider's output. A failed
/// provider still yields an entry, with `error` set and `value` holding a
/// neutral stand-in (empty hits, sentinel record).
#[derive(Debug, Clone)]
pub struct ProviderResult<T> {
    pub provider: &'static str,
    pub value: T,
    pub error: Option<String>,
}

impl<T> ProviderResult<T> {
    pub fn ok(provider: &'static str, value: T) -> Self {
        Self {
            provider,
            value,
            error: None,
        }
    }

    pub fn failed(provider: &'static str, value: T, error: impl Into<String>) -> Self {
        Self {
            provider,
            value,
            error: Some(error.into()),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}
