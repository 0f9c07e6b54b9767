//! SurrealDB implementation of [`ListingRepository`].

use chrono::{DateTime, Utc};
use ridehub_core::error::RidehubResult;
use ridehub_core::models::listing::{CreateListing, Listing};
use ridehub_core::repository::{ListingRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ListingRow {
    seller_id: String,
    title: String,
    description: String,
    price_cents: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ListingRowWithId {
    record_id: String,
    seller_id: String,
    title: String,
    description: String,
    price_cents: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self, id: Uuid) -> Result<Listing, DbError> {
        let seller_id = Uuid::parse_str(&self.seller_id)
            .map_err(|e| DbError::Corrupt(format!("invalid seller UUID: {e}")))?;
        Ok(Listing {
            id,
            seller_id,
            title: self.title,
            description: self.description,
            price_cents: self.price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ListingRowWithId {
    fn try_into_listing(self) -> Result<Listing, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let seller_id = Uuid::parse_str(&self.seller_id)
            .map_err(|e| DbError::Corrupt(format!("invalid seller UUID: {e}")))?;
        Ok(Listing {
            id,
            seller_id,
            title: self.title,
            description: self.description,
            price_cents: self.price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Listing repository.
#[derive(Clone)]
pub struct SurrealListingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealListingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ListingRepository for SurrealListingRepository<C> {
    async fn create(&self, input: CreateListing) -> RidehubResult<Listing> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('listing', $id) SET \
                 seller_id = $seller_id, title = $title, \
                 description = $description, price_cents = $price_cents",
            )
            .bind(("id", id_str.clone()))
            .bind(("seller_id", input.seller_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("price_cents", input.price_cents))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RidehubResult<Listing> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('listing', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn delete(&self, id: Uuid) -> RidehubResult<()> {
        self.db
            .query("DELETE type::record('listing', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_seller(
        &self,
        seller_id: Uuid,
        pagination: Pagination,
    ) -> RidehubResult<PaginatedResult<Listing>> {
        let seller_id_str = seller_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM listing \
                 WHERE seller_id = $seller_id GROUP ALL",
            )
            .bind(("seller_id", seller_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM listing \
                 WHERE seller_id = $seller_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("seller_id", seller_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_listing())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
