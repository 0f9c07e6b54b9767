//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and read or write exactly the
//! rows they name; authorization lives above this layer and performs
//! reads only. Batch operations used by the lifecycle jobs return the
//! number of affected rows so job outcomes can report them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::RidehubResult;
use crate::models::{
    club::{Club, CreateClub, UpdateClub},
    listing::{CreateListing, Listing},
    membership::{ClubMembership, ClubRole, CreateMembership},
    post::{CreatePost, Post},
    ride::{CreateRide, Ride},
    role::Role,
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Principals
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = RidehubResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RidehubResult<User>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = RidehubResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = RidehubResult<User>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = RidehubResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RidehubResult<PaginatedResult<User>>> + Send;
}

/// The canonical multi-valued role store. One row per (user, role);
/// the baseline [`Role::User`] is implicit and never stored.
pub trait RoleGrantRepository: Send + Sync {
    /// Grant a role. Create-if-absent: granting an already-held role
    /// is a no-op, so retried or concurrently duplicated requests
    /// collapse to a single grant row.
    fn grant(&self, user_id: Uuid, role: Role) -> impl Future<Output = RidehubResult<()>> + Send;

    fn revoke(&self, user_id: Uuid, role: Role)
    -> impl Future<Output = RidehubResult<()>> + Send;

    /// All explicitly granted roles for a user. Does not include the
    /// implicit baseline role and does not verify the user exists.
    fn roles_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = RidehubResult<Vec<Role>>> + Send;
}

// ---------------------------------------------------------------------------
// Clubs & membership
// ---------------------------------------------------------------------------

pub trait ClubRepository: Send + Sync {
    fn create(&self, input: CreateClub) -> impl Future<Output = RidehubResult<Club>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RidehubResult<Club>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateClub,
    ) -> impl Future<Output = RidehubResult<Club>> + Send;
    /// Deletes the club and all of its membership rows, Founder rows
    /// included. This is the only path that removes a Founder row.
    fn delete(&self, id: Uuid) -> impl Future<Output = RidehubResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RidehubResult<PaginatedResult<Club>>> + Send;
}

pub trait MembershipRepository: Send + Sync {
    /// Add a membership row. Fails with `Conflict` if the user is
    /// already a member of the club.
    fn add(
        &self,
        input: CreateMembership,
    ) -> impl Future<Output = RidehubResult<ClubMembership>> + Send;

    /// The membership row for (club, user), or `None`. Callers decide
    /// how absence combines with club ownership.
    fn get(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = RidehubResult<Option<ClubMembership>>> + Send;

    fn set_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: ClubRole,
    ) -> impl Future<Output = RidehubResult<ClubMembership>> + Send;

    /// Raw row removal. Founder protection is policy and lives in the
    /// club service, not here.
    fn remove(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = RidehubResult<()>> + Send;

    fn list_members(
        &self,
        club_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RidehubResult<PaginatedResult<ClubMembership>>> + Send;
}

// ---------------------------------------------------------------------------
// Rides
// ---------------------------------------------------------------------------

pub trait RideRepository: Send + Sync {
    fn create(&self, input: CreateRide) -> impl Future<Output = RidehubResult<Ride>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RidehubResult<Ride>> + Send;

    /// Conditionally set `Cancelled`: applies only while the ride is
    /// still `Planned` or `InProgress`, so a lifecycle pass racing
    /// this call cannot resurrect the ride. Fails with `Conflict` if
    /// the ride has already completed or been cancelled.
    fn cancel(&self, id: Uuid) -> impl Future<Output = RidehubResult<Ride>> + Send;

    fn set_keep_permanently(
        &self,
        id: Uuid,
        keep: bool,
    ) -> impl Future<Output = RidehubResult<Ride>> + Send;

    /// Batch transition `Planned -> InProgress` for rides whose
    /// scheduled start has passed. Targeted conditional update;
    /// returns the number of rides transitioned.
    fn start_due(&self, now: DateTime<Utc>) -> impl Future<Output = RidehubResult<u64>> + Send;

    /// Batch transition `InProgress -> Completed` for rides whose
    /// scheduled window has ended, stamping `completed_at`.
    fn complete_due(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = RidehubResult<u64>> + Send;

    /// Permanently delete `Completed` rides with `completed_at` older
    /// than `cutoff`, unless `keep_permanently` is set. Returns the
    /// number of rides deleted.
    fn delete_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = RidehubResult<u64>> + Send;

    fn list_by_creator(
        &self,
        creator_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RidehubResult<PaginatedResult<Ride>>> + Send;
}

// ---------------------------------------------------------------------------
// Marketplace & posts
// ---------------------------------------------------------------------------

pub trait ListingRepository: Send + Sync {
    fn create(&self, input: CreateListing)
    -> impl Future<Output = RidehubResult<Listing>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RidehubResult<Listing>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = RidehubResult<()>> + Send;
    fn list_by_seller(
        &self,
        seller_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RidehubResult<PaginatedResult<Listing>>> + Send;
}

pub trait PostRepository: Send + Sync {
    fn create(&self, input: CreatePost) -> impl Future<Output = RidehubResult<Post>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RidehubResult<Post>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = RidehubResult<()>> + Send;
}
