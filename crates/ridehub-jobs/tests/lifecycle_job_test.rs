//! Integration tests for the lifecycle and cleanup jobs against
//! in-memory SurrealDB.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use ridehub_core::models::ride::{CreateRide, RideStatus};
use ridehub_core::models::user::CreateUser;
use ridehub_core::repository::{RideRepository, UserRepository};
use ridehub_db::repository::{SurrealRideRepository, SurrealUserRepository};
use ridehub_jobs::lifecycle::RIDE_LIFECYCLE_JOB;
use ridehub_jobs::{Job, JobScheduler, RideCleanupJob, RideLifecycleJob};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

async fn setup() -> (Surreal<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ridehub_db::run_migrations(&db).await.unwrap();

    let creator = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            username: "casey".into(),
            email: "casey@example.com".into(),
            display_name: "Casey".into(),
        })
        .await
        .unwrap();

    (db, creator.id)
}

fn ride_input(creator_id: Uuid, start_offset_mins: i64, duration_mins: u32) -> CreateRide {
    CreateRide {
        creator_id,
        club_id: None,
        title: "Test ride".into(),
        scheduled_at: Utc::now() + Duration::minutes(start_offset_mins),
        duration_mins,
    }
}

#[tokio::test]
async fn one_pass_starts_a_due_ride_and_repeats_are_noops() {
    let (db, creator_id) = setup().await;
    let repo = SurrealRideRepository::new(db.clone());

    // Scheduled in the past, still running for another two hours.
    let ride = repo.create(ride_input(creator_id, -10, 130)).await.unwrap();

    let job = RideLifecycleJob::new(SurrealRideRepository::new(db.clone()));

    let first = job.run().await.unwrap();
    assert_eq!(first.affected, 1);
    assert_eq!(
        repo.get_by_id(ride.id).await.unwrap().status,
        RideStatus::InProgress
    );

    let second = job.run().await.unwrap();
    assert_eq!(second.affected, 0, "immediate re-run must change nothing");
}

#[tokio::test]
async fn one_pass_carries_a_fully_elapsed_ride_to_completed() {
    let (db, creator_id) = setup().await;
    let repo = SurrealRideRepository::new(db.clone());

    // Scheduled an hour ago with a 30-minute window: both transition
    // thresholds already passed.
    let ride = repo.create(ride_input(creator_id, -60, 30)).await.unwrap();

    let job = RideLifecycleJob::new(SurrealRideRepository::new(db.clone()));
    let outcome = job.run().await.unwrap();

    // Started and completed within the same pass.
    assert_eq!(outcome.affected, 2);

    let after = repo.get_by_id(ride.id).await.unwrap();
    assert_eq!(after.status, RideStatus::Completed);
    assert!(after.completed_at.is_some());
}

#[tokio::test]
async fn future_rides_are_untouched() {
    let (db, creator_id) = setup().await;
    let repo = SurrealRideRepository::new(db.clone());

    let ride = repo.create(ride_input(creator_id, 60, 90)).await.unwrap();

    let job = RideLifecycleJob::new(SurrealRideRepository::new(db.clone()));
    let outcome = job.run().await.unwrap();

    assert_eq!(outcome.affected, 0);
    assert_eq!(
        repo.get_by_id(ride.id).await.unwrap().status,
        RideStatus::Planned
    );
}

#[tokio::test]
async fn cleanup_deletes_expired_but_spares_flagged_rides() {
    let (db, creator_id) = setup().await;
    let repo = SurrealRideRepository::new(db.clone());

    let expired = repo.create(ride_input(creator_id, -60, 30)).await.unwrap();
    let kept = repo.create(ride_input(creator_id, -60, 30)).await.unwrap();

    RideLifecycleJob::new(SurrealRideRepository::new(db.clone()))
        .run()
        .await
        .unwrap();
    repo.set_keep_permanently(kept.id, true).await.unwrap();

    // Zero-day retention: anything completed is already past the
    // window, so only the flag decides.
    let cleanup = RideCleanupJob::new(SurrealRideRepository::new(db.clone()), 0);
    let outcome = cleanup.run().await.unwrap();
    assert_eq!(outcome.affected, 1);

    assert!(repo.get_by_id(expired.id).await.is_err());
    assert!(repo.get_by_id(kept.id).await.is_ok());

    // Re-running deletes nothing further.
    let again = cleanup.run().await.unwrap();
    assert_eq!(again.affected, 0);
}

#[tokio::test]
async fn cleanup_respects_retention_window() {
    let (db, creator_id) = setup().await;
    let repo = SurrealRideRepository::new(db.clone());

    let ride = repo.create(ride_input(creator_id, -60, 30)).await.unwrap();
    RideLifecycleJob::new(SurrealRideRepository::new(db.clone()))
        .run()
        .await
        .unwrap();

    // The ride completed moments ago; a 30-day window keeps it.
    let cleanup = RideCleanupJob::new(SurrealRideRepository::new(db.clone()), 30);
    let outcome = cleanup.run().await.unwrap();

    assert_eq!(outcome.affected, 0);
    assert!(repo.get_by_id(ride.id).await.is_ok());
}

#[tokio::test]
async fn manual_trigger_through_scheduler_reports_counts() {
    let (db, creator_id) = setup().await;
    let repo = SurrealRideRepository::new(db.clone());

    repo.create(ride_input(creator_id, -10, 130)).await.unwrap();

    let mut scheduler = JobScheduler::new();
    scheduler.register(
        Arc::new(RideLifecycleJob::new(SurrealRideRepository::new(db.clone()))),
        StdDuration::from_secs(3600),
    );

    let outcome = scheduler.run_manually(RIDE_LIFECYCLE_JOB).await.unwrap();
    assert_eq!(outcome.affected, 1);
    assert!(scheduler.last_run(RIDE_LIFECYCLE_JOB).await.is_some());
}
