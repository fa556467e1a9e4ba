use crate::{CollectionId, CollectionMeta, Company, CompanyId, JobId, PageRequest, PageWindow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The front end is up; load collection metadata.
    Started,
    /// Collection metadata arrived from the backend.
    CollectionsLoaded(Result<Vec<CollectionMeta>, String>),
    /// User picked a collection.
    CollectionSelected(CollectionId),
    /// Grid pagination changed (zero-based page).
    PageChanged { page: usize, page_size: usize },
    /// Grid emitted its full new checkbox selection.
    SelectionChanged(Vec<CompanyId>),
    /// Like a single row.
    LikeClicked(CompanyId),
    /// "Add selected": one non-batched request.
    BulkLikeClicked { explicit_ids: Option<Vec<CompanyId>> },
    /// "Add all": resolved ids are sent in chunks.
    BulkLikeAllClicked { explicit_ids: Option<Vec<CompanyId>> },
    /// Stop a running batch before its next chunk.
    CancelBatchClicked,
    ResetLikedClicked,
    /// Plain company listing outside any collection.
    CompaniesRequested { offset: usize, limit: usize },
    CompaniesLoaded(Result<Vec<Company>, String>),
    /// Engine answered a page fetch.
    PageLoaded {
        request: PageRequest,
        result: Result<PageWindow, String>,
    },
    /// Engine finished a non-batched mutation.
    MutationDone {
        mutation: MutationKind,
        result: Result<(), String>,
    },
    /// Engine knows how many ids the job covers.
    BatchStarted { job_id: JobId, total_items: usize },
    /// Engine finished a chunk.
    BatchProgress {
        job_id: JobId,
        items_processed: usize,
    },
    /// Engine stopped the job, for whatever reason.
    BatchDone {
        job_id: JobId,
        result: BatchResultKind,
    },
    /// Render tick.
    Tick,
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    LikeOne(CompanyId),
    LikeMany { count: usize },
    ResetAllLiked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResultKind {
    Completed {
        items_applied: usize,
    },
    /// A chunk failed; earlier chunks were applied, the rest were never sent.
    PartiallyApplied {
        items_applied: usize,
        items_not_applied: usize,
        failed_chunk: usize,
        reason: String,
    },
    Cancelled {
        items_applied: usize,
        items_not_applied: usize,
    },
    /// Fetching the collection's ids failed; nothing was sent.
    ResolutionFailed {
        reason: String,
    },
}
