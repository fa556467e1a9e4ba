use crate::batch::{BatchJob, BatchPhase};
use crate::{
    resolve_selection, AppState, BatchResultKind, CompanyId, Effect, JobId, Msg, MutationKind,
    Notice, Resolution,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::LoadCollections],
        Msg::CollectionsLoaded(Ok(collections)) => {
            state.set_collections(collections);
            if state.collection_id().is_some() {
                Vec::new()
            } else if let Some(collection_id) = state.default_collection() {
                state.select_collection(collection_id);
                state.request_page().into_iter().collect()
            } else {
                Vec::new()
            }
        }
        Msg::CollectionsLoaded(Err(reason)) => {
            state.set_notice(Notice::CollectionsLoadFailed { reason });
            Vec::new()
        }
        Msg::CollectionSelected(collection_id) => {
            state.select_collection(collection_id);
            state.request_page().into_iter().collect()
        }
        Msg::PageChanged { page, page_size } => {
            if page_size == 0 {
                return (state, Vec::new());
            }
            state.set_page(page, page_size);
            state.request_page().into_iter().collect()
        }
        Msg::SelectionChanged(ids) => {
            state.replace_selection(ids);
            Vec::new()
        }
        Msg::LikeClicked(company_id) => start_mutation(
            &mut state,
            MutationKind::LikeOne(company_id),
            Effect::LikeOne(company_id),
        ),
        Msg::BulkLikeClicked { explicit_ids } => bulk_like(&mut state, explicit_ids),
        Msg::BulkLikeAllClicked { explicit_ids } => bulk_like_all(&mut state, explicit_ids),
        Msg::CancelBatchClicked => match state.batch().job_id() {
            Some(job_id) => vec![Effect::CancelBatch { job_id }],
            None => Vec::new(),
        },
        Msg::ResetLikedClicked => start_mutation(
            &mut state,
            MutationKind::ResetAllLiked,
            Effect::ResetAllLiked,
        ),
        Msg::CompaniesRequested { offset, limit } => vec![Effect::FetchCompanies {
            offset,
            limit: limit.max(1),
        }],
        Msg::CompaniesLoaded(Ok(companies)) => {
            state.set_companies(companies);
            Vec::new()
        }
        Msg::CompaniesLoaded(Err(reason)) => {
            state.set_notice(Notice::CompaniesLoadFailed { reason });
            Vec::new()
        }
        Msg::PageLoaded { request, result } => {
            state.apply_page_loaded(&request, result);
            Vec::new()
        }
        Msg::MutationDone { mutation, result } => mutation_done(&mut state, mutation, result),
        Msg::BatchStarted {
            job_id,
            total_items,
        } => {
            if let BatchPhase::Resolving {
                job_id: current,
                batch_size,
            } = *state.batch()
            {
                if current == job_id {
                    state.set_batch(BatchPhase::Running(BatchJob::new(
                        job_id,
                        total_items,
                        batch_size,
                    )));
                }
            }
            Vec::new()
        }
        Msg::BatchProgress {
            job_id,
            items_processed,
        } => {
            if let Some(job) = state.running_job_mut(job_id) {
                job.record_progress(items_processed);
            }
            Vec::new()
        }
        Msg::BatchDone { job_id, result } => batch_done(&mut state, job_id, result),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_mutation(state: &mut AppState, mutation: MutationKind, effect: Effect) -> Vec<Effect> {
    if state.is_busy() {
        state.set_notice(Notice::Busy);
        return Vec::new();
    }
    state.begin_mutation(mutation);
    vec![effect]
}

/// "Add selected": one round trip, never batched. Explicit ids are sent as
/// given, even an empty list. With no ids and no selection nothing is sent;
/// the whole-collection fallback belongs to "add all".
fn bulk_like(state: &mut AppState, explicit_ids: Option<Vec<CompanyId>>) -> Vec<Effect> {
    let resolution = resolve_selection(
        explicit_ids.as_deref(),
        state.selection(),
        state.collection_id().unwrap_or_default(),
    );
    match resolution {
        Resolution::Ids(ids) => start_mutation(
            state,
            MutationKind::LikeMany { count: ids.len() },
            Effect::LikeMany(ids),
        ),
        Resolution::AllInCollection(_) => {
            state.set_notice(Notice::NothingSelected);
            Vec::new()
        }
    }
}

fn bulk_like_all(state: &mut AppState, explicit_ids: Option<Vec<CompanyId>>) -> Vec<Effect> {
    if state.is_busy() {
        state.set_notice(Notice::Busy);
        return Vec::new();
    }
    let batch_size = state.settings().batch_size;
    let resolution = resolve_selection(
        explicit_ids.as_deref(),
        state.selection(),
        state.collection_id().unwrap_or_default(),
    );

    match resolution {
        Resolution::Ids(ids) if ids.is_empty() => {
            state.set_notice(Notice::BatchCompleted { items_applied: 0 });
            if state.settings().clear_selection.on_success() {
                state.clear_selection();
            }
            Vec::new()
        }
        Resolution::AllInCollection(collection_id) if collection_id.is_empty() => {
            state.set_notice(Notice::NoCollection);
            Vec::new()
        }
        Resolution::Ids(ids) => {
            let job_id = state.allocate_job_id();
            state.set_batch(BatchPhase::Running(BatchJob::new(
                job_id,
                ids.len(),
                batch_size,
            )));
            vec![Effect::RunBatch {
                job_id,
                source: Resolution::Ids(ids),
                batch_size,
            }]
        }
        source @ Resolution::AllInCollection(_) => {
            let job_id = state.allocate_job_id();
            state.set_batch(BatchPhase::Resolving { job_id, batch_size });
            vec![Effect::RunBatch {
                job_id,
                source,
                batch_size,
            }]
        }
    }
}

fn mutation_done(
    state: &mut AppState,
    mutation: MutationKind,
    result: Result<(), String>,
) -> Vec<Effect> {
    state.finish_mutation();
    match result {
        Ok(()) => {
            state.set_notice(Notice::Applied(mutation));
            if state.settings().clear_selection.on_success() {
                state.clear_selection();
            }
            state.request_page().into_iter().collect()
        }
        // Selection and page stay as they were so the operator can retry.
        Err(reason) => {
            state.set_notice(Notice::MutationFailed { mutation, reason });
            Vec::new()
        }
    }
}

fn batch_done(state: &mut AppState, job_id: JobId, result: BatchResultKind) -> Vec<Effect> {
    if state.batch().job_id() != Some(job_id) {
        return Vec::new();
    }
    state.set_batch(BatchPhase::Idle);

    let policy = state.settings().clear_selection;
    let (notice, clear, refetch) = match result {
        BatchResultKind::Completed { items_applied } => (
            Notice::BatchCompleted { items_applied },
            policy.on_success(),
            items_applied > 0,
        ),
        BatchResultKind::PartiallyApplied {
            items_applied,
            items_not_applied,
            failed_chunk,
            reason,
        } => (
            Notice::BatchPartiallyApplied {
                items_applied,
                items_not_applied,
                failed_chunk,
                reason,
            },
            policy.on_partial(),
            items_applied > 0,
        ),
        BatchResultKind::Cancelled {
            items_applied,
            items_not_applied,
        } => (
            Notice::BatchCancelled {
                items_applied,
                items_not_applied,
            },
            policy.on_partial(),
            items_applied > 0,
        ),
        BatchResultKind::ResolutionFailed { reason } => {
            (Notice::ResolutionFailed { reason }, false, false)
        }
    };

    state.set_notice(notice);
    if clear {
        state.clear_selection();
    }
    let deferred = state.take_refetch_deferred();
    if refetch || deferred {
        state.request_page().into_iter().collect()
    } else {
        Vec::new()
    }
}
