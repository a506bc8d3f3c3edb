use crate::AlignerError;

/// Worker pool settings for [`crate::BatchAligner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub workers: usize,
    /// Pairs that may wait in the work queue before the submitter blocks.
    pub queue_depth: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            workers,
            queue_depth: 2 * workers,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Result<Self, AlignerError> {
        if workers == 0 {
            return Err(AlignerError::InvalidBatchConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        self.workers = workers;
        self.queue_depth = self.queue_depth.max(workers);
        Ok(self)
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth.max(1);
        self
    }
}
