//! Integration tests for the club service using in-memory SurrealDB.

use std::sync::{Arc, Mutex};

use ridehub_core::RidehubError;
use ridehub_core::models::club::CreateClub;
use ridehub_core::models::membership::{ClubRole, CreateMembership};
use ridehub_core::models::role::Role;
use ridehub_core::models::user::CreateUser;
use ridehub_core::notify::{CommunityEvent, Notifier};
use ridehub_core::repository::{MembershipRepository, RoleGrantRepository, UserRepository};
use ridehub_db::repository::{
    SurrealClubRepository, SurrealMembershipRepository, SurrealRoleGrantRepository,
    SurrealUserRepository,
};
use ridehub_service::ClubService;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

/// Test notifier that records emitted events.
#[derive(Clone, Default)]
struct RecordingNotifier {
    events: Arc<Mutex<Vec<CommunityEvent>>>,
}

impl RecordingNotifier {
    fn events(&self) -> Vec<CommunityEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: CommunityEvent) {
        self.events.lock().unwrap().push(event);
    }
}

async fn setup() -> (Surreal<Db>, Uuid, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ridehub_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let owner = user_repo
        .create(CreateUser {
            username: "olivia".into(),
            email: "olivia@example.com".into(),
            display_name: "Olivia".into(),
        })
        .await
        .unwrap();
    let rider = user_repo
        .create(CreateUser {
            username: "rex".into(),
            email: "rex@example.com".into(),
            display_name: "Rex".into(),
        })
        .await
        .unwrap();

    (db, owner.id, rider.id)
}

fn service(
    db: &Surreal<Db>,
    notifier: RecordingNotifier,
) -> ClubService<
    SurrealClubRepository<Db>,
    SurrealMembershipRepository<Db>,
    SurrealRoleGrantRepository<Db>,
    RecordingNotifier,
> {
    ClubService::new(
        SurrealClubRepository::new(db.clone()),
        SurrealMembershipRepository::new(db.clone()),
        SurrealRoleGrantRepository::new(db.clone()),
        notifier,
    )
}

#[tokio::test]
async fn creating_a_club_grants_club_owner_role() {
    let (db, owner_id, _) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    svc.create(CreateClub {
        owner_id,
        name: "Canyon Carvers".into(),
        description: "".into(),
    })
    .await
    .unwrap();

    let roles = SurrealRoleGrantRepository::new(db)
        .roles_for_user(owner_id)
        .await
        .unwrap();
    assert_eq!(roles, vec![Role::ClubOwner]);
}

#[tokio::test]
async fn second_club_leaves_single_owner_grant() {
    let (db, owner_id, _) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    svc.create(CreateClub {
        owner_id,
        name: "Canyon Carvers".into(),
        description: "".into(),
    })
    .await
    .unwrap();
    svc.create(CreateClub {
        owner_id,
        name: "Night Owls".into(),
        description: "".into(),
    })
    .await
    .unwrap();

    let roles = SurrealRoleGrantRepository::new(db)
        .roles_for_user(owner_id)
        .await
        .unwrap();
    assert_eq!(roles, vec![Role::ClubOwner]);
}

#[tokio::test]
async fn join_emits_notification_and_creates_member_row() {
    let (db, owner_id, rider_id) = setup().await;
    let notifier = RecordingNotifier::default();
    let svc = service(&db, notifier.clone());

    let club = svc
        .create(CreateClub {
            owner_id,
            name: "Canyon Carvers".into(),
            description: "".into(),
        })
        .await
        .unwrap();

    let membership = svc.join(club.id, rider_id).await.unwrap();
    assert_eq!(membership.role, ClubRole::Member);

    assert_eq!(
        notifier.events(),
        vec![CommunityEvent::ClubJoined {
            club_id: club.id,
            user_id: rider_id,
        }]
    );
}

#[tokio::test]
async fn duplicate_join_is_conflict() {
    let (db, owner_id, rider_id) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    let club = svc
        .create(CreateClub {
            owner_id,
            name: "Canyon Carvers".into(),
            description: "".into(),
        })
        .await
        .unwrap();

    svc.join(club.id, rider_id).await.unwrap();
    let result = svc.join(club.id, rider_id).await;

    assert!(matches!(result, Err(RidehubError::Conflict { .. })));
}

#[tokio::test]
async fn joining_missing_club_is_not_found() {
    let (db, _, rider_id) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    let result = svc.join(Uuid::new_v4(), rider_id).await;
    assert!(matches!(result, Err(RidehubError::NotFound { .. })));
}

#[tokio::test]
async fn removing_a_regular_member_works() {
    let (db, owner_id, rider_id) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    let club = svc
        .create(CreateClub {
            owner_id,
            name: "Canyon Carvers".into(),
            description: "".into(),
        })
        .await
        .unwrap();
    svc.join(club.id, rider_id).await.unwrap();

    svc.remove_member(club.id, rider_id).await.unwrap();

    let membership = SurrealMembershipRepository::new(db)
        .get(club.id, rider_id)
        .await
        .unwrap();
    assert!(membership.is_none());
}

#[tokio::test]
async fn promoting_a_member_moves_them_up_the_ladder() {
    let (db, owner_id, rider_id) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    let club = svc
        .create(CreateClub {
            owner_id,
            name: "Canyon Carvers".into(),
            description: "".into(),
        })
        .await
        .unwrap();
    svc.join(club.id, rider_id).await.unwrap();

    let promoted = svc
        .set_member_role(club.id, rider_id, ClubRole::Officer)
        .await
        .unwrap();
    assert_eq!(promoted.role, ClubRole::Officer);
}

#[tokio::test]
async fn founder_row_cannot_be_removed() {
    let (db, owner_id, _) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    let club = svc
        .create(CreateClub {
            owner_id,
            name: "Canyon Carvers".into(),
            description: "".into(),
        })
        .await
        .unwrap();

    SurrealMembershipRepository::new(db.clone())
        .add(CreateMembership {
            club_id: club.id,
            user_id: owner_id,
            role: ClubRole::Founder,
        })
        .await
        .unwrap();

    let result = svc.remove_member(club.id, owner_id).await;
    assert!(matches!(result, Err(RidehubError::Forbidden { .. })));

    // The row survives.
    let membership = SurrealMembershipRepository::new(db)
        .get(club.id, owner_id)
        .await
        .unwrap();
    assert_eq!(membership.unwrap().role, ClubRole::Founder);
}

#[tokio::test]
async fn club_deletion_removes_founder_row() {
    let (db, owner_id, _) = setup().await;
    let svc = service(&db, RecordingNotifier::default());

    let club = svc
        .create(CreateClub {
            owner_id,
            name: "Canyon Carvers".into(),
            description: "".into(),
        })
        .await
        .unwrap();

    SurrealMembershipRepository::new(db.clone())
        .add(CreateMembership {
            club_id: club.id,
            user_id: owner_id,
            role: ClubRole::Founder,
        })
        .await
        .unwrap();

    svc.delete(club.id).await.unwrap();

    let membership = SurrealMembershipRepository::new(db)
        .get(club.id, owner_id)
        .await
        .unwrap();
    assert!(membership.is_none());
}
