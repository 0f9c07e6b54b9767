//! Club service — creation, membership, and deletion orchestration.

use ridehub_core::error::{RidehubError, RidehubResult};
use ridehub_core::models::club::{Club, CreateClub};
use ridehub_core::models::membership::{ClubMembership, ClubRole, CreateMembership};
use ridehub_core::models::role::Role;
use ridehub_core::notify::{CommunityEvent, Notifier};
use ridehub_core::repository::{ClubRepository, MembershipRepository, RoleGrantRepository};
use uuid::Uuid;

/// Club orchestration service.
///
/// Generic over repository implementations so this layer has no
/// dependency on the database crate.
pub struct ClubService<C, M, G, N>
where
    C: ClubRepository,
    M: MembershipRepository,
    G: RoleGrantRepository,
    N: Notifier,
{
    clubs: C,
    memberships: M,
    role_grants: G,
    notifier: N,
}

impl<C, M, G, N> ClubService<C, M, G, N>
where
    C: ClubRepository,
    M: MembershipRepository,
    G: RoleGrantRepository,
    N: Notifier,
{
    pub fn new(clubs: C, memberships: M, role_grants: G, notifier: N) -> Self {
        Self {
            clubs,
            memberships,
            role_grants,
            notifier,
        }
    }

    /// Create a club and grant the creator the `ClubOwner` system
    /// role. The grant is create-if-absent, so a retried request or a
    /// second club by the same owner leaves a single grant row.
    pub async fn create(&self, input: CreateClub) -> RidehubResult<Club> {
        let owner_id = input.owner_id;
        let club = self.clubs.create(input).await?;

        self.role_grants.grant(owner_id, Role::ClubOwner).await?;

        tracing::info!(club_id = %club.id, owner_id = %owner_id, "club created");
        Ok(club)
    }

    /// Join a club as a regular member.
    ///
    /// Duplicate joins surface as `Conflict`. The join notification is
    /// fire-and-forget and can neither block nor fail the join.
    pub async fn join(&self, club_id: Uuid, user_id: Uuid) -> RidehubResult<ClubMembership> {
        // Missing club must read as NotFound, not as a failed insert.
        self.clubs.get_by_id(club_id).await?;

        let membership = self
            .memberships
            .add(CreateMembership {
                club_id,
                user_id,
                role: ClubRole::Member,
            })
            .await?;

        self.notifier
            .notify(CommunityEvent::ClubJoined { club_id, user_id });

        Ok(membership)
    }

    /// Remove a member (leave or removal by a club officer — caller
    /// authorization is decided above this layer).
    ///
    /// A `Founder` membership row is never removable through this
    /// path, regardless of who asks; only whole-club deletion removes
    /// it.
    pub async fn remove_member(&self, club_id: Uuid, user_id: Uuid) -> RidehubResult<()> {
        let membership = self
            .memberships
            .get(club_id, user_id)
            .await?
            .ok_or_else(|| RidehubError::NotFound {
                entity: "club membership".into(),
                id: user_id.to_string(),
            })?;

        if membership.role == ClubRole::Founder {
            return Err(RidehubError::Forbidden {
                reason: "founder memberships can only be removed by deleting the club".into(),
            });
        }

        self.memberships.remove(club_id, user_id).await?;

        self.notifier
            .notify(CommunityEvent::ClubMemberRemoved { club_id, user_id });

        Ok(())
    }

    /// Leave a club voluntarily. Same Founder protection as removal:
    /// a founder cannot leave, only delete the club.
    pub async fn leave(&self, club_id: Uuid, user_id: Uuid) -> RidehubResult<()> {
        self.remove_member(club_id, user_id).await
    }

    /// Change a member's rung on the club ladder.
    pub async fn set_member_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: ClubRole,
    ) -> RidehubResult<ClubMembership> {
        self.memberships.set_role(club_id, user_id, role).await
    }

    /// Delete a club and all of its membership rows, Founder rows
    /// included.
    pub async fn delete(&self, club_id: Uuid) -> RidehubResult<()> {
        // Surface NotFound for a club that is already gone.
        self.clubs.get_by_id(club_id).await?;
        self.clubs.delete(club_id).await?;

        tracing::info!(club_id = %club_id, "club deleted");
        Ok(())
    }
}
