use crate::{CompanyId, JobId, PageRequest, Resolution};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCollections,
    FetchPage(PageRequest),
    FetchCompanies { offset: usize, limit: usize },
    LikeOne(CompanyId),
    LikeMany(Vec<CompanyId>),
    /// Resolve `source` (fetching every id when needed) and apply it chunk by chunk.
    RunBatch {
        job_id: JobId,
        source: Resolution,
        batch_size: usize,
    },
    CancelBatch { job_id: JobId },
    ResetAllLiked,
}
