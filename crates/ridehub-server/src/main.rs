//! RideHub Server — Application entry point.

use std::sync::Arc;
use std::time::Duration;

use ridehub_db::DbManager;
use ridehub_db::repository::SurrealRideRepository;
use ridehub_jobs::{JobScheduler, RideCleanupJob, RideLifecycleJob};
use ridehub_server::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ridehub=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting RideHub server...");

    let config = ServerConfig::from_env();

    let db = match DbManager::connect(&config.db).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = ridehub_db::run_migrations(db.client()).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let mut scheduler = JobScheduler::new();
    scheduler.register(
        Arc::new(RideLifecycleJob::new(SurrealRideRepository::new(
            db.client().clone(),
        ))),
        Duration::from_secs(config.jobs.lifecycle_interval_secs),
    );
    scheduler.register(
        Arc::new(RideCleanupJob::new(
            SurrealRideRepository::new(db.client().clone()),
            config.jobs.retention_days,
        )),
        Duration::from_secs(config.jobs.cleanup_interval_secs),
    );
    scheduler.start().await;

    // The HTTP request layer mounts on top of this process; the core
    // stays up until the process is asked to stop.
    tracing::info!("RideHub server running");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }

    scheduler.shutdown().await;
    tracing::info!("RideHub server stopped.");
}
