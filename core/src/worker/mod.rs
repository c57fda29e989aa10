//! Workers
//!
//! A worker accepts jobs through `push` and reports their status through
//! `wait`. Orchestrators push one job to every worker and then wait on all of
//! them before touching the results, so jobs never outlive the data they
//! share.

mod full_bake_job;
mod job;
mod pool;

// Re-export
pub use full_bake_job::*;
pub use job::*;
pub use pool::*;

use crate::error::*;

/// Executes jobs.
pub trait Worker: Send {
    /// Returns a name for logs.
    fn name(&self) -> &str;

    /// Queues a job.
    ///
    /// * `job` - The job.
    fn push(&mut self, job: Box<dyn Job>) -> Result<()>;

    /// Blocks until every pushed job has finished and returns the first
    /// failure among them.
    fn wait(&mut self) -> Result<()>;
}

/// Runs jobs on the calling thread as soon as they are pushed.
#[derive(Debug, Default)]
pub struct InlineWorker {
    name: String,
    status: Option<RelightError>,
}

impl InlineWorker {
    /// Create a new `InlineWorker`.
    ///
    /// * `name` - Name for logs.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            status: None,
        }
    }
}

impl Worker for InlineWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn push(&mut self, job: Box<dyn Job>) -> Result<()> {
        if let Err(e) = job.execute() {
            self.status.get_or_insert(e);
        }
        Ok(())
    }

    fn wait(&mut self) -> Result<()> {
        match self.status.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Waits on every worker and then returns the first failure.
///
/// * `workers` - Workers that were pushed jobs.
pub fn wait_all(workers: &mut [&mut dyn Worker]) -> Result<()> {
    let mut status = Ok(());
    for worker in workers.iter_mut() {
        if let Err(e) = worker.wait() {
            warn!("Worker '{}' failed: {}", worker.name(), e);
            if status.is_ok() {
                status = Err(e);
            }
        }
    }
    status
}
