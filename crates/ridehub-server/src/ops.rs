//! Operator actions.
//!
//! One administrative entry point exists: running a registered job by
//! name, reserved to `SuperAdmin` principals. The handler's outcome or
//! failure is returned synchronously to the operator.

use ridehub_authz::{AuthContext, require_any_role};
use ridehub_core::error::RidehubResult;
use ridehub_core::models::role::Role;
use ridehub_jobs::{JobOutcome, JobScheduler};

pub async fn run_job(
    ctx: Option<&AuthContext>,
    scheduler: &JobScheduler,
    name: &str,
) -> RidehubResult<JobOutcome> {
    require_any_role(ctx, &[Role::SuperAdmin])?;

    scheduler
        .run_manually(name)
        .await
        .map_err(|e| e.into_ridehub(name))
}
