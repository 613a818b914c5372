use tracing::info;

/// Observes batch progress during a sync. Purely informational.
pub trait ProgressReporter: Send {
    fn start(&mut self, total: usize);
    fn increment(&mut self, count: usize);
    fn stop(&mut self);
}

/// Reports progress through `tracing` at info level.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    total: usize,
    done: usize,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            total: 0,
            done: 0,
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new("Loading profiles in batches")
    }
}

impl ProgressReporter for LogProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        info!(total, "{}", self.label);
    }

    fn increment(&mut self, count: usize) {
        self.done = (self.done + count).min(self.total);
        info!(done = self.done, total = self.total, "{}", self.label);
    }

    fn stop(&mut self) {
        info!(done = self.done, total = self.total, "{} finished", self.label);
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _total: usize) {}

    fn increment(&mut self, _count: usize) {}

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_counts_increments() {
        let mut progress = LogProgress::default();
        progress.start(25);
        progress.increment(10);
        progress.increment(10);
        progress.increment(5);
        progress.stop();
        assert_eq!(progress.done(), 25);
    }

    #[test]
    fn test_log_progress_never_exceeds_total() {
        let mut progress = LogProgress::new("test");
        progress.start(3);
        progress.increment(10);
        assert_eq!(progress.done(), 3);
    }
}
