//! SurrealDB implementation of [`RoleGrantRepository`].
//!
//! Grant rows use a deterministic record id derived from
//! (user, role), which makes `grant` a natural UPSERT: granting an
//! already-held role touches the existing record instead of creating
//! a duplicate, so retried or concurrently duplicated requests
//! collapse to one row. The unique index on (user_id, role) backs
//! this up at the schema level.

use ridehub_core::error::RidehubResult;
use ridehub_core::models::role::Role;
use ridehub_core::repository::RoleGrantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct GrantRow {
    role: String,
}

fn grant_key(user_id: Uuid, role: Role) -> String {
    format!("{}_{}", user_id, role.as_str())
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::from_name(s).ok_or_else(|| DbError::Corrupt(format!("unknown role: {s}")))
}

/// SurrealDB implementation of the role-grant repository.
#[derive(Clone)]
pub struct SurrealRoleGrantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleGrantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleGrantRepository for SurrealRoleGrantRepository<C> {
    async fn grant(&self, user_id: Uuid, role: Role) -> RidehubResult<()> {
        // UPSERT on the deterministic key; granted_at keeps its
        // creation default on re-grant.
        self.db
            .query(
                "UPSERT type::record('role_grant', $key) SET \
                 user_id = $user_id, role = $role",
            )
            .bind(("key", grant_key(user_id, role)))
            .bind(("user_id", user_id.to_string()))
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn revoke(&self, user_id: Uuid, role: Role) -> RidehubResult<()> {
        self.db
            .query("DELETE type::record('role_grant', $key)")
            .bind(("key", grant_key(user_id, role)))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn roles_for_user(&self, user_id: Uuid) -> RidehubResult<Vec<Role>> {
        let mut result = self
            .db
            .query("SELECT role FROM role_grant WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GrantRow> = result.take(0).map_err(DbError::from)?;

        let roles = rows
            .into_iter()
            .map(|row| parse_role(&row.role))
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }
}
