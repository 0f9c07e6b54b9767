//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Unique indexes back the
//! create-if-absent semantics the role-grant and membership
//! repositories rely on.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (principals)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD display_name ON TABLE user TYPE string;
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['Active', 'Suspended', 'Deactivated'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Role grants (canonical multi-valued role store)
-- =======================================================================
DEFINE TABLE role_grant SCHEMAFULL;
DEFINE FIELD user_id ON TABLE role_grant TYPE string;
DEFINE FIELD role ON TABLE role_grant TYPE string \
    ASSERT $value IN ['Rider', 'Seller', 'ClubOwner', 'Admin', \
    'SuperAdmin'];
DEFINE FIELD granted_at ON TABLE role_grant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_grant_user_role ON TABLE role_grant \
    COLUMNS user_id, role UNIQUE;

-- =======================================================================
-- Clubs
-- =======================================================================
DEFINE TABLE club SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE club TYPE string;
DEFINE FIELD name ON TABLE club TYPE string;
DEFINE FIELD description ON TABLE club TYPE string;
DEFINE FIELD created_at ON TABLE club TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE club TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_club_name ON TABLE club COLUMNS name UNIQUE;

-- =======================================================================
-- Club memberships
-- =======================================================================
DEFINE TABLE club_member SCHEMAFULL;
DEFINE FIELD club_id ON TABLE club_member TYPE string;
DEFINE FIELD user_id ON TABLE club_member TYPE string;
DEFINE FIELD role ON TABLE club_member TYPE string \
    ASSERT $value IN ['Member', 'Officer', 'Admin', 'Founder'];
DEFINE FIELD joined_at ON TABLE club_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_club_member_pair ON TABLE club_member \
    COLUMNS club_id, user_id UNIQUE;

-- =======================================================================
-- Rides
-- =======================================================================
DEFINE TABLE ride SCHEMAFULL;
DEFINE FIELD creator_id ON TABLE ride TYPE string;
DEFINE FIELD club_id ON TABLE ride TYPE option<string>;
DEFINE FIELD title ON TABLE ride TYPE string;
DEFINE FIELD status ON TABLE ride TYPE string \
    ASSERT $value IN ['Planned', 'InProgress', 'Completed', \
    'Cancelled'];
DEFINE FIELD scheduled_at ON TABLE ride TYPE datetime;
DEFINE FIELD duration_mins ON TABLE ride TYPE int;
DEFINE FIELD ends_at ON TABLE ride TYPE datetime;
DEFINE FIELD keep_permanently ON TABLE ride TYPE bool DEFAULT false;
DEFINE FIELD completed_at ON TABLE ride TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE ride TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE ride TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_ride_status_start ON TABLE ride \
    COLUMNS status, scheduled_at;
DEFINE INDEX idx_ride_status_end ON TABLE ride COLUMNS status, ends_at;
DEFINE INDEX idx_ride_creator ON TABLE ride COLUMNS creator_id;

-- =======================================================================
-- Marketplace listings
-- =======================================================================
DEFINE TABLE listing SCHEMAFULL;
DEFINE FIELD seller_id ON TABLE listing TYPE string;
DEFINE FIELD title ON TABLE listing TYPE string;
DEFINE FIELD description ON TABLE listing TYPE string;
DEFINE FIELD price_cents ON TABLE listing TYPE int;
DEFINE FIELD created_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_listing_seller ON TABLE listing COLUMNS seller_id;

-- =======================================================================
-- Posts
-- =======================================================================
DEFINE TABLE post SCHEMAFULL;
DEFINE FIELD author_id ON TABLE post TYPE string;
DEFINE FIELD club_id ON TABLE post TYPE option<string>;
DEFINE FIELD body ON TABLE post TYPE string;
DEFINE FIELD created_at ON TABLE post TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_post_author ON TABLE post COLUMNS author_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
