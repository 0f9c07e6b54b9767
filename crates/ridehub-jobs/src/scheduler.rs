//! Process-wide job scheduler.
//!
//! Each registered job gets its own interval loop and its own atomic
//! in-progress flag. An invocation — scheduled or manual — that finds
//! the flag held is skipped, never queued, so the same job can never
//! run twice concurrently while unrelated jobs proceed in parallel.
//! Handler failures are caught here, logged with the job name, and
//! leave both this job and every other job schedulable.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::JobError;
use crate::job::{Job, JobOutcome};

struct RegisteredJob {
    job: Arc<dyn Job>,
    interval: Duration,
    running: Arc<AtomicBool>,
    last_run: Arc<Mutex<Option<DateTime<Utc>>>>,
}

pub struct JobScheduler {
    jobs: HashMap<String, RegisteredJob>,
    shutdown_tx: broadcast::Sender<()>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            jobs: HashMap::new(),
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Register a job under its own name with a fixed cadence.
    /// Registering a second job with the same name replaces the first.
    pub fn register(&mut self, job: Arc<dyn Job>, interval: Duration) {
        let name = job.name().to_string();
        self.jobs.insert(
            name,
            RegisteredJob {
                job,
                interval,
                running: Arc::new(AtomicBool::new(false)),
                last_run: Arc::new(Mutex::new(None)),
            },
        );
    }

    /// Spawn the interval loop for every registered job.
    pub async fn start(&self) {
        let mut handles = self.handles.lock().await;

        for (name, registered) in &self.jobs {
            let job = Arc::clone(&registered.job);
            let running = Arc::clone(&registered.running);
            let last_run = Arc::clone(&registered.last_run);
            let interval = registered.interval;
            let mut shutdown_rx = self.shutdown_tx.subscribe();
            let name = name.clone();

            let handle = tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {
                            match execute(&job, &running, &last_run).await {
                                Ok(outcome) => {
                                    info!(
                                        job = %name,
                                        affected = outcome.affected,
                                        message = %outcome.message,
                                        "scheduled job completed"
                                    );
                                }
                                Err(JobError::AlreadyRunning(_)) => {
                                    warn!(job = %name, "previous run still in flight, skipping");
                                }
                                Err(e) => {
                                    error!(job = %name, error = %e, "scheduled job failed");
                                }
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            info!(job = %name, "shutting down job loop");
                            break;
                        }
                    }
                }
            });

            handles.push(handle);
        }

        info!(job_count = handles.len(), "job scheduler started");
    }

    /// Execute a job immediately, outside its schedule, and return the
    /// handler's outcome (or failure) synchronously. Subject to the
    /// same overlap guard as scheduled runs.
    pub async fn run_manually(&self, name: &str) -> Result<JobOutcome, JobError> {
        let registered = self
            .jobs
            .get(name)
            .ok_or_else(|| JobError::NotFound(name.to_string()))?;

        info!(job = %name, "manual job trigger");
        execute(&registered.job, &registered.running, &registered.last_run).await
    }

    /// When the named job last finished a run (success or failure).
    pub async fn last_run(&self, name: &str) -> Option<DateTime<Utc>> {
        let registered = self.jobs.get(name)?;
        *registered.last_run.lock().await
    }

    pub fn job_names(&self) -> Vec<String> {
        self.jobs.keys().cloned().collect()
    }

    /// Stop all job loops and wait for them to wind down. In-flight
    /// handlers finish their current run.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        let mut handles = self.handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        info!("job scheduler shut down");
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one guarded invocation of a job.
async fn execute(
    job: &Arc<dyn Job>,
    running: &AtomicBool,
    last_run: &Mutex<Option<DateTime<Utc>>>,
) -> Result<JobOutcome, JobError> {
    // The flag is per job, so unrelated jobs never serialize against
    // each other.
    if running
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(JobError::AlreadyRunning(job.name().to_string()));
    }

    let result = job.run().await;

    *last_run.lock().await = Some(Utc::now());
    running.store(false, Ordering::Release);

    result
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use async_trait::async_trait;

    use super::*;

    struct CountingJob {
        name: String,
        runs: AtomicU32,
    }

    impl CountingJob {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                runs: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &str {
            &self.name
        }

        async fn run(&self) -> Result<JobOutcome, JobError> {
            let count = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(JobOutcome {
                message: format!("run {count}"),
                affected: 0,
            })
        }
    }

    struct FailingJob;

    #[async_trait]
    impl Job for FailingJob {
        fn name(&self) -> &str {
            "failing"
        }

        async fn run(&self) -> Result<JobOutcome, JobError> {
            Err(JobError::Failed {
                message: "store unavailable".into(),
            })
        }
    }

    /// Holds its overlap guard until released through a notify.
    struct BlockingJob {
        entered: Arc<tokio::sync::Notify>,
        release: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl Job for BlockingJob {
        fn name(&self) -> &str {
            "blocking"
        }

        async fn run(&self) -> Result<JobOutcome, JobError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(JobOutcome {
                message: "released".into(),
                affected: 0,
            })
        }
    }

    #[tokio::test]
    async fn manual_trigger_runs_registered_job() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(Arc::new(CountingJob::new("counter")), Duration::from_secs(3600));

        let outcome = scheduler.run_manually("counter").await.unwrap();
        assert_eq!(outcome.message, "run 1");
        assert!(scheduler.last_run("counter").await.is_some());
    }

    #[tokio::test]
    async fn manual_trigger_unknown_job_is_not_found() {
        let scheduler = JobScheduler::new();
        let result = scheduler.run_manually("ghost").await;
        assert!(matches!(result, Err(JobError::NotFound(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn failure_does_not_wedge_the_job() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(Arc::new(FailingJob), Duration::from_secs(3600));

        let first = scheduler.run_manually("failing").await;
        assert!(matches!(first, Err(JobError::Failed { .. })));

        // The guard was released; the job is immediately runnable again
        // and other jobs are unaffected.
        let second = scheduler.run_manually("failing").await;
        assert!(matches!(second, Err(JobError::Failed { .. })));
    }

    #[tokio::test]
    async fn overlapping_invocations_are_skipped_not_queued() {
        let entered = Arc::new(tokio::sync::Notify::new());
        let release = Arc::new(tokio::sync::Notify::new());

        let mut scheduler = JobScheduler::new();
        scheduler.register(
            Arc::new(BlockingJob {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
            }),
            Duration::from_secs(3600),
        );
        let scheduler = Arc::new(scheduler);

        let first = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.run_manually("blocking").await })
        };

        // Wait until the first invocation holds the guard, then try
        // again.
        entered.notified().await;
        let second = scheduler.run_manually("blocking").await;
        assert!(matches!(second, Err(JobError::AlreadyRunning(_))));

        release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.message, "released");

        // Guard released: a fresh invocation goes through.
        let entered_again = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.run_manually("blocking").await })
        };
        entered.notified().await;
        release.notify_one();
        assert!(entered_again.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn independent_jobs_run_concurrently() {
        let entered = Arc::new(tokio::sync::Notify::new());
        let release = Arc::new(tokio::sync::Notify::new());

        let mut scheduler = JobScheduler::new();
        scheduler.register(
            Arc::new(BlockingJob {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
            }),
            Duration::from_secs(3600),
        );
        scheduler.register(Arc::new(CountingJob::new("counter")), Duration::from_secs(3600));
        let scheduler = Arc::new(scheduler);

        let blocked = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.run_manually("blocking").await })
        };
        entered.notified().await;

        // A different job is not serialized behind the blocked one.
        let outcome = scheduler.run_manually("counter").await.unwrap();
        assert_eq!(outcome.message, "run 1");

        release.notify_one();
        blocked.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn scheduled_loop_fires_and_shuts_down() {
        let mut scheduler = JobScheduler::new();
        let job = Arc::new(CountingJob::new("ticker"));
        scheduler.register(Arc::clone(&job), Duration::from_millis(20));

        scheduler.start().await;
        tokio::time::sleep(Duration::from_millis(90)).await;
        scheduler.shutdown().await;

        let runs = job.runs.load(Ordering::SeqCst);
        assert!(runs >= 2, "expected at least two scheduled runs, got {runs}");
    }
}
