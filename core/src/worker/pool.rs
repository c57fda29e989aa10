//! Thread workers and worker pools.

use super::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Runs jobs in order on a dedicated named thread.
pub struct ThreadWorker {
    name: String,

    /// Job queue. Dropping it stops the thread.
    jobs: Option<Sender<Box<dyn Job>>>,

    /// One status per finished job.
    done: Receiver<Result<()>>,

    /// Jobs pushed but not yet waited for.
    pending: usize,

    handle: Option<JoinHandle<()>>,
}

impl ThreadWorker {
    /// Create a new `ThreadWorker` and start its thread.
    ///
    /// * `name` - Thread name.
    pub fn new(name: &str) -> Result<Self> {
        let (job_tx, job_rx) = unbounded::<Box<dyn Job>>();
        let (done_tx, done_rx) = unbounded::<Result<()>>();

        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                for job in job_rx.iter() {
                    if done_tx.send(job.execute()).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| RelightError::WorkerFailed(format!("unable to spawn '{}': {}", name, e)))?;

        Ok(Self {
            name: name.to_owned(),
            jobs: Some(job_tx),
            done: done_rx,
            pending: 0,
            handle: Some(handle),
        })
    }
}

impl Worker for ThreadWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn push(&mut self, job: Box<dyn Job>) -> Result<()> {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| RelightError::WorkerFailed(format!("'{}' is stopped", self.name)))?;
        jobs.send(job)
            .map_err(|_| RelightError::WorkerFailed(format!("'{}' is not accepting jobs", self.name)))?;
        self.pending += 1;
        Ok(())
    }

    fn wait(&mut self) -> Result<()> {
        let mut status = Ok(());
        while self.pending > 0 {
            self.pending -= 1;
            let r = self
                .done
                .recv()
                .unwrap_or_else(|_| Err(RelightError::WorkerFailed(format!("'{}' stopped during a job", self.name))));
            if status.is_ok() {
                status = r;
            }
        }
        status
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.jobs = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Worker '{}' panicked", self.name);
            }
        }
    }
}

/// A fixed set of workers created once per bake.
#[derive(Default)]
pub struct WorkerPool {
    workers: Vec<Box<dyn Worker>>,
}

impl WorkerPool {
    /// Creates a pool of `n` thread workers.
    ///
    /// * `n` - Number of workers.
    pub fn threaded(n: usize) -> Result<Self> {
        let workers = (0..n)
            .map(|i| ThreadWorker::new(&format!("relight-worker-{}", i)).map(|w| Box::new(w) as Box<dyn Worker>))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { workers })
    }

    /// Creates a pool of `n` inline workers.
    ///
    /// * `n` - Number of workers.
    pub fn inline(n: usize) -> Self {
        let workers = (0..n)
            .map(|i| Box::new(InlineWorker::new(&format!("inline-{}", i))) as Box<dyn Worker>)
            .collect();
        Self { workers }
    }

    /// Returns the number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Returns true if the pool has no workers.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Returns the workers.
    pub fn workers_mut(&mut self) -> &mut [Box<dyn Worker>] {
        &mut self.workers
    }
}
