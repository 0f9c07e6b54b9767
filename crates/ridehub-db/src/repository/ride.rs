//! SurrealDB implementation of [`RideRepository`].
//!
//! Lifecycle transitions are targeted conditional updates: the WHERE
//! predicate re-checks that the ride still qualifies at write time, so
//! a ride cancelled by its creator mid-pass is never resurrected into
//! `InProgress`, and re-running a pass immediately matches zero rows.

use chrono::{DateTime, Utc};
use ridehub_core::error::RidehubResult;
use ridehub_core::models::ride::{CreateRide, Ride, RideStatus};
use ridehub_core::repository::{PaginatedResult, Pagination, RideRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RideRow {
    creator_id: String,
    club_id: Option<String>,
    title: String,
    status: String,
    scheduled_at: DateTime<Utc>,
    duration_mins: u32,
    ends_at: DateTime<Utc>,
    keep_permanently: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RideRowWithId {
    record_id: String,
    creator_id: String,
    club_id: Option<String>,
    title: String,
    status: String,
    scheduled_at: DateTime<Utc>,
    duration_mins: u32,
    ends_at: DateTime<Utc>,
    keep_permanently: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<RideStatus, DbError> {
    RideStatus::from_name(s).ok_or_else(|| DbError::Corrupt(format!("unknown ride status: {s}")))
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

impl RideRow {
    fn into_ride(self, id: Uuid) -> Result<Ride, DbError> {
        Ok(Ride {
            id,
            creator_id: parse_uuid(&self.creator_id, "creator")?,
            club_id: self
                .club_id
                .map(|c| parse_uuid(&c, "club"))
                .transpose()?,
            title: self.title,
            status: parse_status(&self.status)?,
            scheduled_at: self.scheduled_at,
            duration_mins: self.duration_mins,
            ends_at: self.ends_at,
            keep_permanently: self.keep_permanently,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RideRowWithId {
    fn try_into_ride(self) -> Result<Ride, DbError> {
        let id = parse_uuid(&self.record_id, "ride")?;
        Ok(Ride {
            id,
            creator_id: parse_uuid(&self.creator_id, "creator")?,
            club_id: self
                .club_id
                .map(|c| parse_uuid(&c, "club"))
                .transpose()?,
            title: self.title,
            status: parse_status(&self.status)?,
            scheduled_at: self.scheduled_at,
            duration_mins: self.duration_mins,
            ends_at: self.ends_at,
            keep_permanently: self.keep_permanently,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Ride repository.
#[derive(Clone)]
pub struct SurrealRideRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRideRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RideRepository for SurrealRideRepository<C> {
    async fn create(&self, input: CreateRide) -> RidehubResult<Ride> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let ends_at = input.ends_at();

        let result = self
            .db
            .query(
                "CREATE type::record('ride', $id) SET \
                 creator_id = $creator_id, club_id = $club_id, \
                 title = $title, status = 'Planned', \
                 scheduled_at = $scheduled_at, \
                 duration_mins = $duration_mins, ends_at = $ends_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("creator_id", input.creator_id.to_string()))
            .bind(("club_id", input.club_id.map(|c| c.to_string())))
            .bind(("title", input.title))
            .bind(("scheduled_at", input.scheduled_at))
            .bind(("duration_mins", input.duration_mins))
            .bind(("ends_at", ends_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ride".into(),
            id: id_str,
        })?;

        Ok(row.into_ride(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RidehubResult<Ride> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('ride', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ride".into(),
            id: id_str,
        })?;

        Ok(row.into_ride(id)?)
    }

    async fn cancel(&self, id: Uuid) -> RidehubResult<Ride> {
        let id_str = id.to_string();

        // Existence first, so a missing ride is NotFound rather than
        // an empty conditional update.
        self.get_by_id(id).await?;

        let mut result = self
            .db
            .query(
                "UPDATE type::record('ride', $id) SET \
                 status = 'Cancelled', updated_at = time::now() \
                 WHERE status IN ['Planned', 'InProgress']",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RideRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_ride(id)?),
            // Predicate failed: the ride raced to Completed or was
            // already cancelled.
            None => Err(DbError::Duplicate {
                entity: "ride cancellation".into(),
            }
            .into()),
        }
    }

    async fn set_keep_permanently(&self, id: Uuid, keep: bool) -> RidehubResult<Ride> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('ride', $id) SET \
                 keep_permanently = $keep, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("keep", keep))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ride".into(),
            id: id_str,
        })?;

        Ok(row.into_ride(id)?)
    }

    async fn start_due(&self, now: DateTime<Utc>) -> RidehubResult<u64> {
        // Count qualifying rides first, then apply the conditional
        // update with the same predicate.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM ride \
                 WHERE status = 'Planned' AND scheduled_at <= $now \
                 GROUP ALL",
            )
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query(
                "UPDATE ride SET status = 'InProgress', \
                 updated_at = time::now() \
                 WHERE status = 'Planned' AND scheduled_at <= $now",
            )
            .bind(("now", now))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(total)
    }

    async fn complete_due(&self, now: DateTime<Utc>) -> RidehubResult<u64> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM ride \
                 WHERE status = 'InProgress' AND ends_at <= $now \
                 GROUP ALL",
            )
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query(
                "UPDATE ride SET status = 'Completed', \
                 completed_at = $now, updated_at = time::now() \
                 WHERE status = 'InProgress' AND ends_at <= $now",
            )
            .bind(("now", now))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(total)
    }

    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> RidehubResult<u64> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM ride \
                 WHERE status = 'Completed' \
                 AND keep_permanently = false \
                 AND completed_at != NONE \
                 AND completed_at <= $cutoff \
                 GROUP ALL",
            )
            .bind(("cutoff", cutoff))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query(
                "DELETE ride \
                 WHERE status = 'Completed' \
                 AND keep_permanently = false \
                 AND completed_at != NONE \
                 AND completed_at <= $cutoff",
            )
            .bind(("cutoff", cutoff))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        pagination: Pagination,
    ) -> RidehubResult<PaginatedResult<Ride>> {
        let creator_id_str = creator_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM ride \
                 WHERE creator_id = $creator_id GROUP ALL",
            )
            .bind(("creator_id", creator_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM ride \
                 WHERE creator_id = $creator_id \
                 ORDER BY scheduled_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("creator_id", creator_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RideRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_ride())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
