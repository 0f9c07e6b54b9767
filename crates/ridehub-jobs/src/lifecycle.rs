//! Ride lifecycle pass — the periodic batch job that advances ride
//! state based on elapsed time.

use async_trait::async_trait;
use chrono::Utc;

use ridehub_core::repository::RideRepository;

use crate::error::JobError;
use crate::job::{Job, JobOutcome};

pub const RIDE_LIFECYCLE_JOB: &str = "ride-lifecycle";

/// Advances `Planned -> InProgress -> Completed` over all qualifying
/// rides in one pass.
///
/// The start transition is applied before the complete transition, so
/// a ride already past both thresholds (short duration, long cadence)
/// moves through `InProgress` and ends the pass `Completed` rather
/// than stalling one state per pass. Both writes are conditional on
/// the ride still qualifying, which makes the pass safe to re-run and
/// safe against concurrent creator cancellations.
pub struct RideLifecycleJob<R: RideRepository> {
    rides: R,
}

impl<R: RideRepository> RideLifecycleJob<R> {
    pub fn new(rides: R) -> Self {
        Self { rides }
    }
}

#[async_trait]
impl<R: RideRepository + 'static> Job for RideLifecycleJob<R> {
    fn name(&self) -> &str {
        RIDE_LIFECYCLE_JOB
    }

    async fn run(&self) -> Result<JobOutcome, JobError> {
        let now = Utc::now();

        let started = self.rides.start_due(now).await?;
        let completed = self.rides.complete_due(now).await?;

        Ok(JobOutcome {
            message: format!("started {started} rides, completed {completed}"),
            affected: started + completed,
        })
    }
}
