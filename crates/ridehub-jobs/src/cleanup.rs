//! Retention cleanup — permanent deletion of old completed rides.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use ridehub_core::repository::RideRepository;

use crate::error::JobError;
use crate::job::{Job, JobOutcome};

pub const RIDE_CLEANUP_JOB: &str = "ride-cleanup";

/// Deletes `Completed` rides whose completion is older than the
/// retention window. Rides flagged `keep_permanently` are retained
/// indefinitely; the flag is part of the deletion predicate, not a
/// post-filter.
pub struct RideCleanupJob<R: RideRepository> {
    rides: R,
    retention_days: u32,
}

impl<R: RideRepository> RideCleanupJob<R> {
    pub fn new(rides: R, retention_days: u32) -> Self {
        Self {
            rides,
            retention_days,
        }
    }
}

#[async_trait]
impl<R: RideRepository + 'static> Job for RideCleanupJob<R> {
    fn name(&self) -> &str {
        RIDE_CLEANUP_JOB
    }

    async fn run(&self) -> Result<JobOutcome, JobError> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.retention_days));

        let deleted = self.rides.delete_expired(cutoff).await?;

        Ok(JobOutcome {
            message: format!("deleted {deleted} expired rides"),
            affected: deleted,
        })
    }
}
