//! Job registry: in-memory lifecycle tracking with bounded retention.
//!
//! The registry knows nothing about what a job does. Pipelines create a
//! job, drive its status transitions, and attach a terminal result or
//! error; a background reaper evicts records past the retention window
//! regardless of status. A job absent from the registry (reaped or never
//! created) is indistinguishable from "not found"; callers treat both as
//! a 404-equivalent.
//!
//! The registry is an explicitly constructed instance, injected into
//! whatever drives pipelines, so tests can run isolated registries and
//! production can later swap in a shared external store without touching
//! pipeline code.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{Job, JobId, JobStatus, JobUpdate};

/// Tracks the lifecycle of background units of work.
///
/// The top-level map supports concurrent insertion, lookup, and deletion
/// from the reaper and from many simultaneously-running jobs. Per-job
/// records are updated only by the pipeline execution that owns them.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate a fresh job in `Pending`. Never fails.
    pub fn create(&self) -> JobId {
        let now = Utc::now();
        let job = Job {
            id: Uuid::now_v7(),
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };

        let id = job.id;
        self.jobs.write().unwrap().insert(id, job);
        debug!(job_id = %id, "Created job");
        id
    }

    /// Apply a partial update.
    ///
    /// Returns `false` for an unknown id, and `false` for a status change
    /// on a job already in a terminal state. No transition leaves
    /// `Completed` or `Failed`.
    pub fn update(&self, id: JobId, update: JobUpdate) -> bool {
        let mut jobs = self.jobs.write().unwrap();
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };

        if let Some(status) = update.status {
            if job.status.is_terminal() && status != job.status {
                debug!(job_id = %id, current = ?job.status, requested = ?status,
                    "Refusing status change out of terminal state");
                return false;
            }
            job.status = status;
        }
        if let Some(result) = update.result {
            job.result = Some(result);
        }
        if let Some(error) = update.error {
            job.error = Some(error);
        }
        job.updated_at = Utc::now();
        true
    }

    /// Look up a job by id.
    pub fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().unwrap().get(&id).cloned()
    }

    /// Remove a job explicitly. Returns whether it existed.
    pub fn delete(&self, id: JobId) -> bool {
        self.jobs.write().unwrap().remove(&id).is_some()
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().unwrap().is_empty()
    }

    /// Remove all jobs created more than `max_age` ago, regardless of
    /// status. Returns the number removed.
    pub fn reap(&self, max_age: Duration) -> usize {
        let Ok(max_age) = chrono::Duration::from_std(max_age) else {
            return 0;
        };
        let cutoff = Utc::now() - max_age;

        let mut jobs = self.jobs.write().unwrap();
        let before = jobs.len();
        jobs.retain(|_, job| job.created_at >= cutoff);
        let removed = before - jobs.len();

        if removed > 0 {
            info!(removed, "Reaped expired jobs");
        }
        removed
    }

    /// Spawn the background reaper loop for this registry's lifetime.
    ///
    /// Wakes every `every` and evicts jobs older than `max_age`. The
    /// returned handle can be dropped; the loop keeps the registry alive
    /// through its own `Arc` clone.
    pub fn spawn_reaper(
        self: &Arc<Self>,
        every: Duration,
        max_age: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                registry.reap(max_age);
            }
        })
    }

    #[cfg(test)]
    fn backdate(&self, id: JobId, created_at: chrono::DateTime<Utc>) {
        if let Some(job) = self.jobs.write().unwrap().get_mut(&id) {
            job.created_at = created_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_pending() {
        let registry = JobRegistry::new();
        let id = registry.create();

        let job = registry.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_status_sequence_is_monotonic() {
        let registry = JobRegistry::new();
        let id = registry.create();

        assert!(registry.update(id, JobUpdate::status(JobStatus::Running)));
        assert!(registry.update(id, JobUpdate::completed(serde_json::json!({"count": 3}))));

        // Terminal states are absorbing.
        assert!(!registry.update(id, JobUpdate::status(JobStatus::Running)));
        assert!(!registry.update(id, JobUpdate::status(JobStatus::Failed)));

        let job = registry.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.unwrap()["count"], 3);
    }

    #[test]
    fn test_update_unknown_id_returns_false() {
        let registry = JobRegistry::new();
        assert!(!registry.update(Uuid::now_v7(), JobUpdate::status(JobStatus::Running)));
    }

    #[test]
    fn test_update_advances_updated_at() {
        let registry = JobRegistry::new();
        let id = registry.create();
        let created = registry.get(id).unwrap().updated_at;

        registry.update(id, JobUpdate::status(JobStatus::Running));
        assert!(registry.get(id).unwrap().updated_at >= created);
    }

    #[test]
    fn test_delete() {
        let registry = JobRegistry::new();
        let id = registry.create();

        assert!(registry.delete(id));
        assert!(!registry.delete(id));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_reap_respects_retention_window() {
        let registry = JobRegistry::new();
        let max_age = Duration::from_secs(3600);

        let fresh = registry.create();
        let old = registry.create();
        registry.update(old, JobUpdate::completed(serde_json::json!({})));

        // Just inside the window: both survive.
        registry.backdate(old, Utc::now() - chrono::Duration::seconds(3599));
        assert_eq!(registry.reap(max_age), 0);
        assert!(registry.get(old).is_some());

        // Just past the window: reaped even though completed.
        registry.backdate(old, Utc::now() - chrono::Duration::seconds(3601));
        assert_eq!(registry.reap(max_age), 1);
        assert!(registry.get(old).is_none());
        assert!(registry.get(fresh).is_some());
    }
}
