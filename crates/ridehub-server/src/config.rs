//! Server configuration from environment variables.
//!
//! Every knob has a working default for local development; production
//! deployments override through `RIDEHUB_*` variables.

use ridehub_db::DbConfig;
use ridehub_jobs::JobsConfig;

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub jobs: JobsConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut db = DbConfig::default();
        if let Ok(url) = std::env::var("RIDEHUB_DB_URL") {
            db.url = url;
        }
        if let Ok(namespace) = std::env::var("RIDEHUB_DB_NAMESPACE") {
            db.namespace = namespace;
        }
        if let Ok(database) = std::env::var("RIDEHUB_DB_NAME") {
            db.database = database;
        }
        if let Ok(username) = std::env::var("RIDEHUB_DB_USER") {
            db.username = username;
        }
        if let Ok(password) = std::env::var("RIDEHUB_DB_PASSWORD") {
            db.password = password;
        }

        let mut jobs = JobsConfig::default();
        if let Some(secs) = env_u64("RIDEHUB_LIFECYCLE_INTERVAL_SECS") {
            jobs.lifecycle_interval_secs = secs;
        }
        if let Some(secs) = env_u64("RIDEHUB_CLEANUP_INTERVAL_SECS") {
            jobs.cleanup_interval_secs = secs;
        }
        if let Some(days) = env_u64("RIDEHUB_RIDE_RETENTION_DAYS") {
            jobs.retention_days = days as u32;
        }

        Self { db, jobs }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
