//! The object-safe job contract.

use async_trait::async_trait;

use crate::error::JobError;

/// What a completed run reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub message: String,
    /// Rows transitioned, deleted, or otherwise touched.
    pub affected: u64,
}

/// A named, independently schedulable unit of work.
///
/// Handlers take no input and must be idempotent: running the same job
/// twice in immediate succession finds nothing left to do the second
/// time.
#[async_trait]
pub trait Job: Send + Sync {
    /// Stable registry name, also used for manual triggering.
    fn name(&self) -> &str;

    async fn run(&self) -> Result<JobOutcome, JobError>;
}
