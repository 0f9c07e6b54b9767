//! SurrealDB implementation of [`PostRepository`].

use chrono::{DateTime, Utc};
use ridehub_core::error::RidehubResult;
use ridehub_core::models::post::{CreatePost, Post};
use ridehub_core::repository::PostRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PostRow {
    author_id: String,
    club_id: Option<String>,
    body: String,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, id: Uuid) -> Result<Post, DbError> {
        let author_id = Uuid::parse_str(&self.author_id)
            .map_err(|e| DbError::Corrupt(format!("invalid author UUID: {e}")))?;
        let club_id = self
            .club_id
            .map(|c| {
                Uuid::parse_str(&c)
                    .map_err(|e| DbError::Corrupt(format!("invalid club UUID: {e}")))
            })
            .transpose()?;
        Ok(Post {
            id,
            author_id,
            club_id,
            body: self.body,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Post repository.
#[derive(Clone)]
pub struct SurrealPostRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPostRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PostRepository for SurrealPostRepository<C> {
    async fn create(&self, input: CreatePost) -> RidehubResult<Post> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('post', $id) SET \
                 author_id = $author_id, club_id = $club_id, \
                 body = $body",
            )
            .bind(("id", id_str.clone()))
            .bind(("author_id", input.author_id.to_string()))
            .bind(("club_id", input.club_id.map(|c| c.to_string())))
            .bind(("body", input.body))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PostRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "post".into(),
            id: id_str,
        })?;

        Ok(row.into_post(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RidehubResult<Post> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('post', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PostRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "post".into(),
            id: id_str,
        })?;

        Ok(row.into_post(id)?)
    }

    async fn delete(&self, id: Uuid) -> RidehubResult<()> {
        self.db
            .query("DELETE type::record('post', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
