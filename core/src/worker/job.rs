//! Jobs

use crate::baker::*;
use crate::error::*;
use crate::progress::*;
use crate::scene::Scene;
use std::sync::Arc;

/// A unit of work a `Worker` executes.
pub trait Job: Send {
    /// Runs the job to completion.
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Any closure returning a status is a job.
impl<F> Job for F
where
    F: FnOnce() -> Result<()> + Send,
{
    fn execute(self: Box<Self>) -> Result<()> {
        (*self)()
    }
}

/// Bakes the part of one mesh selected by an iterator.
pub struct BakeMeshJob {
    /// Scene the mesh belongs to.
    pub scene: Arc<Scene>,

    /// Kernel to run.
    pub baker: Arc<dyn Baker>,

    /// Index of the mesh in the scene.
    pub mesh: usize,

    /// Selects the lumels this job bakes.
    pub iterator: Box<dyn BakeIterator>,

    /// Notified after every step.
    pub progress: Option<Arc<dyn Progress>>,

    /// Checked before every step.
    pub cancel: CancellationToken,
}

impl Job for BakeMeshJob {
    fn execute(self: Box<Self>) -> Result<()> {
        let Self {
            scene,
            baker,
            mesh,
            mut iterator,
            progress,
            cancel,
        } = *self;
        let mesh = scene.mesh(mesh)?;
        baker.bake_mesh(mesh, Some(iterator.as_mut()), progress.as_deref(), &cancel)
    }
}
