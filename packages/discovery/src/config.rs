//! Configuration for the discovery pipeline.

use std::time::Duration;

/// Tuning knobs for a [`DiscoveryPipeline`](crate::pipeline::DiscoveryPipeline).
///
/// The defaults mirror production behavior; tests override individual
/// fields as needed.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Hits requested from each search provider per query.
    ///
    /// Default: 10.
    pub max_hits_per_query: usize,

    /// Oversampling multiplier for the name-extraction search pool.
    ///
    /// The pool targets `oversample_factor * requested_count` hits so the
    /// ranking step has material to work with. Default: 2.
    pub oversample_factor: usize,

    /// Sampling temperature for ranking and extraction completions.
    ///
    /// Default: 0.0 (deterministic as the provider allows).
    pub temperature: f32,

    /// How often the job reaper wakes.
    ///
    /// Default: 10 minutes.
    pub reaper_interval: Duration,

    /// Jobs older than this are reaped regardless of status.
    ///
    /// Default: 1 hour.
    pub job_retention: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_hits_per_query: 10,
            oversample_factor: 2,
            temperature: 0.0,
            reaper_interval: Duration::from_secs(600),
            job_retention: Duration::from_secs(3600),
        }
    }
}
