//! SurrealDB implementation of [`ClubRepository`].

use chrono::{DateTime, Utc};
use ridehub_core::error::RidehubResult;
use ridehub_core::models::club::{Club, CreateClub, UpdateClub};
use ridehub_core::repository::{ClubRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ClubRow {
    owner_id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ClubRowWithId {
    record_id: String,
    owner_id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClubRow {
    fn into_club(self, id: Uuid) -> Result<Club, DbError> {
        let owner_id = Uuid::parse_str(&self.owner_id)
            .map_err(|e| DbError::Corrupt(format!("invalid owner UUID: {e}")))?;
        Ok(Club {
            id,
            owner_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ClubRowWithId {
    fn try_into_club(self) -> Result<Club, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let owner_id = Uuid::parse_str(&self.owner_id)
            .map_err(|e| DbError::Corrupt(format!("invalid owner UUID: {e}")))?;
        Ok(Club {
            id,
            owner_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Club repository.
#[derive(Clone)]
pub struct SurrealClubRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealClubRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ClubRepository for SurrealClubRepository<C> {
    async fn create(&self, input: CreateClub) -> RidehubResult<Club> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('club', $id) SET \
                 owner_id = $owner_id, name = $name, \
                 description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|_| DbError::Duplicate {
            entity: "club".into(),
        })?;

        let rows: Vec<ClubRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "club".into(),
            id: id_str,
        })?;

        Ok(row.into_club(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RidehubResult<Club> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('club', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClubRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "club".into(),
            id: id_str,
        })?;

        Ok(row.into_club(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateClub) -> RidehubResult<Club> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('club', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ClubRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "club".into(),
            id: id_str,
        })?;

        Ok(row.into_club(id)?)
    }

    async fn delete(&self, id: Uuid) -> RidehubResult<()> {
        let id_str = id.to_string();

        // Membership rows (Founder included) go with the club; this is
        // the only path that removes a Founder row.
        self.db
            .query(
                "DELETE club_member WHERE club_id = $id; \
                 DELETE type::record('club', $id);",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> RidehubResult<PaginatedResult<Club>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM club GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM club \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClubRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_club())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
