use std::fmt::Debug;
use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{debug, info, warn};

/// An item's job failed; items after `index` were never started.
#[derive(Error, Debug)]
#[error("Task {index} failed after {completed} completed: {source}")]
pub struct RunFailure<E>
where
    E: std::error::Error + 'static,
{
    pub index: usize,
    pub completed: usize,
    #[source]
    pub source: E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
}

/// Runs jobs strictly one after another, in input order, and stops at the
/// first failure. A job is only started once the previous one has finished.
#[derive(Default)]
pub struct SequentialExecutor {
    show_progress: bool,
}

impl SequentialExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run<T, E, Fut, F>(
        &self,
        items: Vec<T>,
        mut job: F,
    ) -> Result<RunSummary, RunFailure<E>>
    where
        T: Debug,
        E: std::error::Error + 'static,
        F: FnMut(usize, T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let total = items.len();
        if total == 0 {
            debug!("No items to process");
            return Ok(RunSummary {
                total,
                completed: 0,
            });
        }

        info!(total, "Starting sequential execution");
        let progress = self.create_progress_bar(total);

        let mut completed = 0;
        for (index, item) in items.into_iter().enumerate() {
            debug!(index, ?item, "Processing item");
            if let Err(source) = job(index, item).await {
                warn!(index, error = %source, "Task failed, aborting remaining items");
                progress.abandon_with_message(format!("Failed at item {}", index + 1));
                return Err(RunFailure {
                    index,
                    completed,
                    source,
                });
            }
            completed += 1;
            progress.inc(1);
        }

        progress.finish_with_message("All tasks completed successfully");
        info!(total, completed, "Sequential execution completed");

        Ok(RunSummary { total, completed })
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        ) {
            progress.set_style(style.progress_chars("#>-"));
        }
        progress
    }
}
