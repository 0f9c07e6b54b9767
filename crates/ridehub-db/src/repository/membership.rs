//! SurrealDB implementation of [`MembershipRepository`].
//!
//! Membership rows use a deterministic record id derived from
//! (club, user), so `get` and `remove` are direct record accesses and
//! a duplicate join is rejected by the CREATE on an existing id.

use chrono::{DateTime, Utc};
use ridehub_core::error::RidehubResult;
use ridehub_core::models::membership::{ClubMembership, ClubRole, CreateMembership};
use ridehub_core::repository::{MembershipRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MembershipRow {
    club_id: String,
    user_id: String,
    role: String,
    joined_at: DateTime<Utc>,
}

fn member_key(club_id: Uuid, user_id: Uuid) -> String {
    format!("{club_id}_{user_id}")
}

fn parse_club_role(s: &str) -> Result<ClubRole, DbError> {
    ClubRole::from_name(s).ok_or_else(|| DbError::Corrupt(format!("unknown club role: {s}")))
}

impl MembershipRow {
    fn try_into_membership(self) -> Result<ClubMembership, DbError> {
        let club_id = Uuid::parse_str(&self.club_id)
            .map_err(|e| DbError::Corrupt(format!("invalid club UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Corrupt(format!("invalid user UUID: {e}")))?;
        Ok(ClubMembership {
            club_id,
            user_id,
            role: parse_club_role(&self.role)?,
            joined_at: self.joined_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the club-membership repository.
#[derive(Clone)]
pub struct SurrealMembershipRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMembershipRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MembershipRepository for SurrealMembershipRepository<C> {
    async fn add(&self, input: CreateMembership) -> RidehubResult<ClubMembership> {
        let key = member_key(input.club_id, input.user_id);

        let result = self
            .db
            .query(
                "CREATE type::record('club_member', $key) SET \
                 club_id = $club_id, user_id = $user_id, role = $role",
            )
            .bind(("key", key))
            .bind(("club_id", input.club_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        // CREATE on an existing record id (or the unique index) is the
        // only failure mode of this statement.
        let mut result = result.check().map_err(|_| DbError::Duplicate {
            entity: "club membership".into(),
        })?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "club membership".into(),
            id: member_key(input.club_id, input.user_id),
        })?;

        Ok(row.try_into_membership()?)
    }

    async fn get(&self, club_id: Uuid, user_id: Uuid) -> RidehubResult<Option<ClubMembership>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('club_member', $key)")
            .bind(("key", member_key(club_id, user_id)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_membership()?)),
            None => Ok(None),
        }
    }

    async fn set_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: ClubRole,
    ) -> RidehubResult<ClubMembership> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('club_member', $key) SET \
                 role = $role",
            )
            .bind(("key", member_key(club_id, user_id)))
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "club membership".into(),
            id: member_key(club_id, user_id),
        })?;

        Ok(row.try_into_membership()?)
    }

    async fn remove(&self, club_id: Uuid, user_id: Uuid) -> RidehubResult<()> {
        self.db
            .query("DELETE type::record('club_member', $key)")
            .bind(("key", member_key(club_id, user_id)))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_members(
        &self,
        club_id: Uuid,
        pagination: Pagination,
    ) -> RidehubResult<PaginatedResult<ClubMembership>> {
        let club_id_str = club_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM club_member \
                 WHERE club_id = $club_id GROUP ALL",
            )
            .bind(("club_id", club_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT * FROM club_member \
                 WHERE club_id = $club_id \
                 ORDER BY joined_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("club_id", club_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_membership())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
