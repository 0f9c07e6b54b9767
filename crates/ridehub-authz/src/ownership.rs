//! Ownership and club-membership resolution.
//!
//! Decides whether a principal may act on a specific resource. Each
//! decision performs exactly one resource lookup (plus, for clubs, one
//! membership lookup) — never "list everything the user owns". This
//! keeps the check O(1) and preserves the distinction between a
//! missing resource (`NotFound`) and a present-but-unauthorized one
//! (`Forbidden`).

use ridehub_core::error::RidehubResult;
use ridehub_core::models::membership::ClubRole;
use ridehub_core::models::resource::ResourceKind;
use ridehub_core::models::role::Role;
use ridehub_core::repository::{
    ClubRepository, ListingRepository, MembershipRepository, PostRepository, RideRepository,
};
use uuid::Uuid;

use crate::error::AuthzError;
use crate::principal::AuthContext;

/// Resolves per-resource access for a principal.
pub struct OwnershipResolver<C, M, R, L, P>
where
    C: ClubRepository,
    M: MembershipRepository,
    R: RideRepository,
    L: ListingRepository,
    P: PostRepository,
{
    clubs: C,
    memberships: M,
    rides: R,
    listings: L,
    posts: P,
}

impl<C, M, R, L, P> OwnershipResolver<C, M, R, L, P>
where
    C: ClubRepository,
    M: MembershipRepository,
    R: RideRepository,
    L: ListingRepository,
    P: PostRepository,
{
    pub fn new(clubs: C, memberships: M, rides: R, listings: L, posts: P) -> Self {
        Self {
            clubs,
            memberships,
            rides,
            listings,
            posts,
        }
    }

    /// May `ctx` act on the identified resource?
    ///
    /// 1. System `Admin`/`SuperAdmin`: allow unconditionally.
    /// 2. The resource's owner field equals the principal: allow.
    /// 3. Clubs only: membership role `Admin`/`Founder` on the club
    ///    ladder also allows. The club's registered owner already
    ///    passed step 2 and needs no membership row.
    /// 4. Otherwise deny with `Forbidden`; a missing resource is
    ///    `NotFound`, never `Forbidden`.
    pub async fn can_act_on(
        &self,
        ctx: &AuthContext,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> RidehubResult<()> {
        if ctx.roles.contains(Role::Admin) || ctx.roles.contains(Role::SuperAdmin) {
            return Ok(());
        }

        let owner_id = match kind {
            ResourceKind::Ride => self.rides.get_by_id(resource_id).await?.creator_id,
            ResourceKind::Listing => self.listings.get_by_id(resource_id).await?.seller_id,
            ResourceKind::Post => self.posts.get_by_id(resource_id).await?.author_id,
            ResourceKind::Club => {
                let club = self.clubs.get_by_id(resource_id).await?;
                if club.owner_id == ctx.user_id {
                    return Ok(());
                }
                // Not the owner: a sufficiently senior membership
                // still qualifies.
                let membership = self.memberships.get(resource_id, ctx.user_id).await?;
                if membership.is_some_and(|m| m.role >= ClubRole::Admin) {
                    return Ok(());
                }
                return Err(AuthzError::NotOwner { kind }.into());
            }
        };

        if owner_id == ctx.user_id {
            Ok(())
        } else {
            Err(AuthzError::NotOwner { kind }.into())
        }
    }

    /// Allow iff the principal's club role sits at or above `min` on
    /// the ladder. The club owner short-circuits to `Founder` even
    /// without a membership row; system `Admin`/`SuperAdmin` pass
    /// regardless of membership.
    pub async fn require_club_role(
        &self,
        ctx: &AuthContext,
        club_id: Uuid,
        min: ClubRole,
    ) -> RidehubResult<()> {
        if ctx.roles.contains(Role::Admin) || ctx.roles.contains(Role::SuperAdmin) {
            return Ok(());
        }

        let club = self.clubs.get_by_id(club_id).await?;
        if club.owner_id == ctx.user_id {
            return Ok(());
        }

        let membership = self.memberships.get(club_id, ctx.user_id).await?;
        if membership.is_some_and(|m| m.role >= min) {
            return Ok(());
        }

        Err(AuthzError::InsufficientClubRole { required: min }.into())
    }
}
