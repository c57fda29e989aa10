//! Progress reporting and cancellation.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Receives a notification after every step of a bake. Workers share one
/// instance, so notifications may arrive from several threads.
pub trait Progress: Send + Sync {
    /// Called once before any step with the total number of steps.
    ///
    /// * `total` - Total steps over all workers.
    fn begin(&self, _total: u64) {}

    /// Called after a step.
    ///
    /// * `step`       - Steps completed by the reporting iterator.
    /// * `step_count` - Steps the reporting iterator will take.
    fn notify(&self, step: usize, step_count: usize);

    /// Called once after the last step.
    fn finish(&self) {}
}

impl Progress for ProgressBar {
    fn begin(&self, total: u64) {
        self.set_length(total);
        self.set_position(0);
    }

    fn notify(&self, _step: usize, _step_count: usize) {
        self.inc(1);
    }

    fn finish(&self) {
        self.finish_with_message("Bake complete");
    }
}

/// Creates a progress bar for a terminal.
///
/// * `total`   - Total steps.
/// * `message` - Message shown next to the bar.
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .map(|s| s.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(total);
    bar.set_style(style);
    bar.set_message(message.to_owned());
    bar
}

/// Silent `Progress` that only counts notifications.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    total: AtomicU64,
    steps: AtomicU64,
}

impl ProgressCounter {
    /// Creates a new `ProgressCounter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of notifications received.
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Acquire)
    }

    /// Returns the total announced by `begin`.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }
}

impl Progress for ProgressCounter {
    fn begin(&self, total: u64) {
        self.total.store(total, Ordering::Release);
    }

    fn notify(&self, _step: usize, _step_count: usize) {
        self.steps.fetch_add(1, Ordering::AcqRel);
    }
}

/// Shared flag that stops a bake between steps.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(pub Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once `cancel` was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raises the flag. Running steps finish before the bake stops.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_counts() {
        let c = ProgressCounter::new();
        c.begin(3);
        c.notify(1, 3);
        c.notify(2, 3);
        assert_eq!(c.total(), 3);
        assert_eq!(c.steps(), 2);
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn progress_bar_tracks_steps() {
        let bar = ProgressBar::hidden();
        Progress::begin(&bar, 4);
        Progress::notify(&bar, 1, 4);
        assert_eq!(bar.position(), 1);
        assert_eq!(bar.length(), Some(4));
    }
}
