//! Integration tests for the ride service using in-memory SurrealDB.

use chrono::{Duration, Utc};
use ridehub_core::RidehubError;
use ridehub_core::models::ride::{CreateRide, RideStatus};
use ridehub_core::models::user::CreateUser;
use ridehub_core::notify::TracingNotifier;
use ridehub_core::repository::{RideRepository, UserRepository};
use ridehub_db::repository::{SurrealRideRepository, SurrealUserRepository};
use ridehub_service::RideService;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

async fn setup() -> (Surreal<Db>, Uuid, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ridehub_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let creator = user_repo
        .create(CreateUser {
            username: "casey".into(),
            email: "casey@example.com".into(),
            display_name: "Casey".into(),
        })
        .await
        .unwrap();
    let other = user_repo
        .create(CreateUser {
            username: "onlooker".into(),
            email: "onlooker@example.com".into(),
            display_name: "Onlooker".into(),
        })
        .await
        .unwrap();

    (db, creator.id, other.id)
}

fn service(db: &Surreal<Db>) -> RideService<SurrealRideRepository<Db>, TracingNotifier> {
    RideService::new(SurrealRideRepository::new(db.clone()), TracingNotifier)
}

fn ride_input(creator_id: Uuid) -> CreateRide {
    CreateRide {
        creator_id,
        club_id: None,
        title: "Sunset cruise".into(),
        scheduled_at: Utc::now() + Duration::hours(1),
        duration_mins: 90,
    }
}

#[tokio::test]
async fn creator_can_cancel_before_completion() {
    let (db, creator_id, _) = setup().await;
    let svc = service(&db);

    let ride = svc.create(ride_input(creator_id)).await.unwrap();
    let cancelled = svc.cancel(creator_id, ride.id).await.unwrap();

    assert_eq!(cancelled.status, RideStatus::Cancelled);
}

#[tokio::test]
async fn non_creator_cannot_cancel() {
    let (db, creator_id, other_id) = setup().await;
    let svc = service(&db);

    let ride = svc.create(ride_input(creator_id)).await.unwrap();
    let result = svc.cancel(other_id, ride.id).await;

    assert!(matches!(result, Err(RidehubError::Forbidden { .. })));
    assert_eq!(
        SurrealRideRepository::new(db)
            .get_by_id(ride.id)
            .await
            .unwrap()
            .status,
        RideStatus::Planned
    );
}

#[tokio::test]
async fn cancelling_missing_ride_is_not_found() {
    let (db, creator_id, _) = setup().await;
    let svc = service(&db);

    let result = svc.cancel(creator_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RidehubError::NotFound { .. })));
}

#[tokio::test]
async fn cancel_after_completion_is_rejected() {
    let (db, creator_id, _) = setup().await;
    let svc = service(&db);
    let repo = SurrealRideRepository::new(db);

    let ride = svc
        .create(CreateRide {
            creator_id,
            club_id: None,
            title: "Short spin".into(),
            scheduled_at: Utc::now() - Duration::hours(1),
            duration_mins: 30,
        })
        .await
        .unwrap();

    let now = Utc::now();
    repo.start_due(now).await.unwrap();
    repo.complete_due(now).await.unwrap();

    let result = svc.cancel(creator_id, ride.id).await;
    assert!(matches!(result, Err(RidehubError::Conflict { .. })));
}

#[tokio::test]
async fn retention_flag_round_trips() {
    let (db, creator_id, _) = setup().await;
    let svc = service(&db);

    let ride = svc.create(ride_input(creator_id)).await.unwrap();
    assert!(!ride.keep_permanently);

    let flagged = svc.set_keep_permanently(ride.id, true).await.unwrap();
    assert!(flagged.keep_permanently);

    let unflagged = svc.set_keep_permanently(ride.id, false).await.unwrap();
    assert!(!unflagged.keep_permanently);
}
