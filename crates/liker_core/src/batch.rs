use crate::JobId;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Number of chunks `total` items split into; the last one may be short.
pub fn chunk_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(batch_size.max(1))
}

/// `min(100, processed / total * 100)`, or 0 when there is nothing to do.
pub fn progress_percent(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (processed as f64 / total as f64 * 100.0).min(100.0)
}

/// One in-flight chunked like run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub job_id: JobId,
    pub total_items: usize,
    pub batch_size: usize,
    pub items_processed: usize,
    pub in_progress: bool,
}

impl BatchJob {
    pub fn new(job_id: JobId, total_items: usize, batch_size: usize) -> Self {
        Self {
            job_id,
            total_items,
            batch_size,
            items_processed: 0,
            in_progress: true,
        }
    }

    /// Progress never goes backwards, even if reports arrive out of order.
    pub fn record_progress(&mut self, items_processed: usize) {
        self.items_processed = self
            .items_processed
            .max(items_processed)
            .min(self.total_items);
    }

    pub fn percent(&self) -> f64 {
        progress_percent(self.items_processed, self.total_items)
    }

    pub fn chunks_sent(&self) -> usize {
        chunk_count(self.items_processed, self.batch_size)
    }

    pub fn chunk_total(&self) -> usize {
        chunk_count(self.total_items, self.batch_size)
    }
}

/// `Idle -> Resolving -> Running -> Idle`. `Resolving` only occurs when the
/// whole collection's ids have to be fetched first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BatchPhase {
    #[default]
    Idle,
    Resolving {
        job_id: JobId,
        batch_size: usize,
    },
    Running(BatchJob),
}

impl BatchPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, BatchPhase::Idle)
    }

    pub fn job_id(&self) -> Option<JobId> {
        match self {
            BatchPhase::Idle => None,
            BatchPhase::Resolving { job_id, .. } => Some(*job_id),
            BatchPhase::Running(job) => Some(job.job_id),
        }
    }
}
