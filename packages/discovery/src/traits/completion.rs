//! Opaque text-completion capability.
//!
//! The ranking and extraction "intelligence" behind the pipeline: given a
//! prompt, returns text, possibly JSON. Treated as unreliable: it can
//! fail outright or answer with malformed content, so every call site
//! handles both paths.

use async_trait::async_trait;

use crate::error::Result;

/// Requested shape of the completion output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Ask the backend for a JSON object. Callers still parse defensively.
    Json,
}

/// Per-call completion options.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub format: ResponseFormat,
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    /// JSON output at the given temperature.
    pub fn json(temperature: f32) -> Self {
        Self {
            format: ResponseFormat::Json,
            temperature: Some(temperature),
        }
    }

    /// Plain text output at the given temperature.
    pub fn text(temperature: f32) -> Self {
        Self {
            format: ResponseFormat::Text,
            temperature: Some(temperature),
        }
    }
}

/// Text-completion capability.
///
/// # Implementations
///
/// - [`OpenAiCompletion`](crate::ai::OpenAiCompletion)
/// - [`MockCompletion`](crate::testing::MockCompletion)
#[async_trait]
pub trait Completion: Send + Sync {
    /// Complete a prompt, returning the raw response text.
    async fn complete(&self, prompt: &str, opts: CompletionOptions) -> Result<String>;
}

/// Strip a markdown code fence some backends wrap JSON responses in.
///
/// Returns the inner content for ```` ```json ... ``` ```` (or bare
/// ```` ``` ````) responses, and the trimmed input otherwise.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop a language tag on the opening fence.
    let body = match body.split_once('\n') {
        Some((first_line, remainder))
            if first_line.trim().chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            remainder
        }
        _ => body,
    };
    body.trim()
}
