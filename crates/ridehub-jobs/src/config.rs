//! Job cadence and retention configuration.

/// Configuration for the scheduled jobs.
#[derive(Debug, Clone)]
pub struct JobsConfig {
    /// Seconds between ride lifecycle passes (default: 60).
    pub lifecycle_interval_secs: u64,
    /// Seconds between retention-cleanup passes (default: 3600).
    pub cleanup_interval_secs: u64,
    /// Days a completed ride is retained before the cleanup job may
    /// delete it (default: 30). `keep_permanently` overrides this.
    pub retention_days: u32,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            lifecycle_interval_secs: 60,
            cleanup_interval_secs: 3600,
            retention_days: 30,
        }
    }
}
