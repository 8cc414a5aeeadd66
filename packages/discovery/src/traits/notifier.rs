//! Notification collaborator boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Payload for a "your results are ready" notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryNotice {
    pub category: String,
    pub result_count: usize,
}

/// Fire-and-forget user notification.
///
/// The pipeline calls this best-effort after a job completes; a failure is
/// logged and swallowed, never escalated into the job's state.
///
/// # Implementations
///
/// - [`ExpoNotifier`](crate::notifiers::ExpoNotifier)
/// - [`NoopNotifier`](crate::notifiers::NoopNotifier)
/// - [`MockNotifier`](crate::testing::MockNotifier)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, owner_id: Uuid, notice: &DiscoveryNotice) -> Result<()>;
}
