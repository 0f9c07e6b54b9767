//! SurrealDB connection management.

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::{info, warn};

/// Connection settings for the SurrealDB instance backing RideHub.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// How many times to retry the initial connection before giving
    /// up. The lifecycle jobs start with the process, so the store
    /// being briefly unavailable at boot should not be fatal.
    pub connect_attempts: u32,
    /// Delay between connection attempts.
    pub connect_retry_delay: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "ridehub".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
            connect_attempts: 5,
            connect_retry_delay: Duration::from_secs(2),
        }
    }
}

/// Holds the live SurrealDB client the repositories clone from.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, authenticate as root, and select the configured
    /// namespace and database, retrying per [`DbConfig`] if the store
    /// is not up yet.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        let mut attempt = 1;
        loop {
            match Self::try_connect(config).await {
                Ok(manager) => {
                    info!(
                        url = %config.url,
                        namespace = %config.namespace,
                        database = %config.database,
                        "connected to SurrealDB"
                    );
                    return Ok(manager);
                }
                Err(e) if attempt < config.connect_attempts => {
                    warn!(
                        attempt,
                        max_attempts = config.connect_attempts,
                        error = %e,
                        "SurrealDB not reachable, retrying"
                    );
                    tokio::time::sleep(config.connect_retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Ok(Self { db })
    }

    /// The underlying client. Repositories hold their own clone.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
