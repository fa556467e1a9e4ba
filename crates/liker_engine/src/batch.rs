use liker_logging::{liker_info, liker_warn};
use tokio_util::sync::CancellationToken;

use crate::{
    BatchFailure, BatchOutcome, BatchProgress, BatchSource, CompanyId, EngineEvent, Gateway,
    JobId,
};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Applies likes in contiguous chunks, one request in flight at a time.
///
/// Chunk `n + 1` is only sent after chunk `n` answered. The first failing
/// chunk stops the run: earlier chunks count as applied, the failing chunk and
/// everything after it do not. Nothing is retried.
#[derive(Debug, Clone, Copy)]
pub struct BatchMutationEngine {
    batch_size: usize,
}

impl Default for BatchMutationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchMutationEngine {
    pub fn new(batch_size: usize) -> Self {
        if batch_size == 0 {
            liker_warn!("Batch size 0 is not usable, falling back to 1");
        }
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Contiguous chunks of at most `batch_size`; the last one may be shorter.
    pub fn chunks<'a>(&self, ids: &'a [CompanyId]) -> std::slice::Chunks<'a, CompanyId> {
        ids.chunks(self.batch_size)
    }

    /// Turns the source into concrete ids. A failed fetch aborts before any write.
    pub async fn resolve(
        &self,
        gateway: &dyn Gateway,
        source: BatchSource,
    ) -> Result<Vec<CompanyId>, BatchFailure> {
        match source {
            BatchSource::Ids(ids) => Ok(ids),
            BatchSource::AllInCollection(collection_id) => {
                let ids = gateway
                    .read_all_identifiers(&collection_id)
                    .await
                    .map_err(BatchFailure::Resolution)?;
                liker_info!(
                    "Resolved {} ids for collection {}",
                    ids.len(),
                    collection_id
                );
                Ok(ids)
            }
        }
    }

    /// Resolves the source, then applies it.
    pub async fn run(
        &self,
        gateway: &dyn Gateway,
        job_id: JobId,
        source: BatchSource,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome, BatchFailure> {
        let ids = self.resolve(gateway, source).await.inspect_err(|err| {
            liker_warn!("Job {} aborted before any write: {}", job_id, err);
        })?;
        sink.emit(EngineEvent::BatchResolved {
            job_id,
            total_items: ids.len(),
        });
        self.apply(gateway, job_id, &ids, sink, cancel).await
    }

    /// Sends `ids` chunk by chunk. Cancellation is checked between chunks.
    pub async fn apply(
        &self,
        gateway: &dyn Gateway,
        job_id: JobId,
        ids: &[CompanyId],
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome, BatchFailure> {
        let total_items = ids.len();
        let chunk_count = total_items.div_ceil(self.batch_size);
        let mut items_processed = 0;

        for (chunk_index, chunk) in self.chunks(ids).enumerate() {
            if cancel.is_cancelled() {
                liker_info!(
                    "Job {} cancelled after {}/{} items",
                    job_id,
                    items_processed,
                    total_items
                );
                return Ok(BatchOutcome::Cancelled {
                    items_applied: items_processed,
                    items_not_applied: total_items - items_processed,
                });
            }

            if let Err(error) = gateway.like_many_batch(chunk).await {
                liker_warn!(
                    "Job {} chunk {}/{} failed, {} items already applied: {}",
                    job_id,
                    chunk_index + 1,
                    chunk_count,
                    items_processed,
                    error
                );
                return Err(BatchFailure::Chunk {
                    chunk_index,
                    items_applied: items_processed,
                    items_not_applied: total_items - items_processed,
                    error,
                });
            }

            items_processed += chunk.len();
            liker_info!(
                "Job {} chunk {}/{} done ({}/{} items)",
                job_id,
                chunk_index + 1,
                chunk_count,
                items_processed,
                total_items
            );
            sink.emit(EngineEvent::BatchProgress(BatchProgress {
                job_id,
                chunk_index,
                chunk_count,
                items_processed,
                total_items,
            }));
        }

        Ok(BatchOutcome::Completed {
            items_applied: items_processed,
        })
    }
}
