//! Job model for tracked background work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque job handle. Generated at creation, never reused.
pub type JobId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is absorbing. No transition leaves a terminal
    /// state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A unit of trackable asynchronous work.
///
/// `result` is present only when `Completed`; `error` only when `Failed`.
/// `updated_at` advances on every status or payload mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied through [`JobRegistry::update`](crate::jobs::JobRegistry::update).
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl JobUpdate {
    /// Update only the status.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Terminal success with a result payload.
    pub fn completed(result: serde_json::Value) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            result: Some(result),
            error: None,
        }
    }

    /// Terminal failure with a human-readable message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            result: None,
            error: Some(message.into()),
        }
    }
}
