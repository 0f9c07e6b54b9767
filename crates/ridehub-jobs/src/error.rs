//! Job execution error types.

use ridehub_core::error::RidehubError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("no job registered under '{0}'")]
    NotFound(String),

    /// The job's overlap guard was held: an invocation arrived while a
    /// previous run of the same job was still in flight. Skipped, not
    /// queued.
    #[error("job '{0}' is already running")]
    AlreadyRunning(String),

    #[error("{message}")]
    Failed { message: String },
}

impl From<RidehubError> for JobError {
    fn from(err: RidehubError) -> Self {
        JobError::Failed {
            message: err.to_string(),
        }
    }
}

impl JobError {
    /// Attach the job name and convert for the operator-facing path.
    pub fn into_ridehub(self, job: &str) -> RidehubError {
        match self {
            JobError::NotFound(name) => RidehubError::NotFound {
                entity: "job".into(),
                id: name,
            },
            other => RidehubError::Job {
                job: job.to_string(),
                cause: other.to_string(),
            },
        }
    }
}
