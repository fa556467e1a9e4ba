use liker_core::{
    BatchResultKind, CollectionMeta, Company, Effect, JobId, Msg, MutationKind, PageRequest,
    PageWindow, Resolution,
};
use liker_engine::{
    BatchFailure, BatchOutcome, BatchSource, CollectionPage, EngineEvent, EngineHandle, Mutation,
    PageQuery,
};
use liker_logging::{liker_debug, liker_info, liker_warn};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadCollections => self.engine.load_collections(),
                Effect::FetchPage(request) => {
                    liker_debug!(
                        "FetchPage collection={} offset={} limit={}",
                        request.collection_id,
                        request.offset,
                        request.limit
                    );
                    self.engine.fetch_page(PageQuery {
                        collection_id: request.collection_id,
                        offset: request.offset,
                        limit: request.limit,
                    });
                }
                Effect::FetchCompanies { offset, limit } => {
                    self.engine.fetch_companies(offset, limit)
                }
                Effect::LikeOne(company_id) => {
                    self.engine.mutate(Mutation::LikeOne(company_id))
                }
                Effect::LikeMany(company_ids) => {
                    liker_info!("LikeMany count={}", company_ids.len());
                    self.engine.mutate(Mutation::LikeMany(company_ids));
                }
                Effect::RunBatch {
                    job_id,
                    source,
                    batch_size,
                } => {
                    let source = match source {
                        Resolution::Ids(ids) => BatchSource::Ids(ids),
                        Resolution::AllInCollection(id) => BatchSource::AllInCollection(id),
                    };
                    liker_info!("RunBatch job_id={} batch_size={}", job_id, batch_size);
                    self.engine.run_batch(job_id, source, batch_size);
                }
                Effect::CancelBatch { job_id } => self.engine.cancel_batch(job_id),
                Effect::ResetAllLiked => self.engine.mutate(Mutation::ResetAllLiked),
            }
        }
    }

    /// Everything the engine reported since the last call.
    pub fn drain_messages(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CollectionsLoaded(result) => Msg::CollectionsLoaded(
            result
                .map(|collections| {
                    collections
                        .into_iter()
                        .map(|meta| CollectionMeta {
                            id: meta.id,
                            name: meta.name,
                        })
                        .collect()
                })
                .map_err(|err| err.to_string()),
        ),
        EngineEvent::PageLoaded { query, result } => {
            let request = PageRequest {
                collection_id: query.collection_id,
                offset: query.offset,
                limit: query.limit,
            };
            let result = result
                .map(|page| map_page(&request, page))
                .map_err(|err| err.to_string());
            Msg::PageLoaded { request, result }
        }
        EngineEvent::CompaniesLoaded(result) => Msg::CompaniesLoaded(
            result
                .map(|batch| batch.companies.into_iter().map(map_company).collect())
                .map_err(|err| err.to_string()),
        ),
        EngineEvent::MutationCompleted { mutation, result } => Msg::MutationDone {
            mutation: match mutation {
                Mutation::LikeOne(company_id) => MutationKind::LikeOne(company_id),
                Mutation::LikeMany(company_ids) => MutationKind::LikeMany {
                    count: company_ids.len(),
                },
                Mutation::ResetAllLiked => MutationKind::ResetAllLiked,
            },
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::BatchResolved {
            job_id,
            total_items,
        } => Msg::BatchStarted {
            job_id,
            total_items,
        },
        EngineEvent::BatchProgress(progress) => Msg::BatchProgress {
            job_id: progress.job_id,
            items_processed: progress.items_processed,
        },
        EngineEvent::BatchFinished { job_id, result } => Msg::BatchDone {
            job_id,
            result: map_batch_result(job_id, result),
        },
    }
}

fn map_page(request: &PageRequest, page: CollectionPage) -> PageWindow {
    PageWindow {
        collection_id: request.collection_id.clone(),
        collection_name: page.name,
        companies: page.companies.into_iter().map(map_company).collect(),
        total: page.total,
    }
}

fn map_company(company: liker_engine::Company) -> Company {
    Company {
        id: company.id,
        name: company.name,
        liked: company.liked,
    }
}

fn map_batch_result(job_id: JobId, result: Result<BatchOutcome, BatchFailure>) -> BatchResultKind {
    match result {
        Ok(BatchOutcome::Completed { items_applied }) => {
            BatchResultKind::Completed { items_applied }
        }
        Ok(BatchOutcome::Cancelled {
            items_applied,
            items_not_applied,
        }) => BatchResultKind::Cancelled {
            items_applied,
            items_not_applied,
        },
        Err(BatchFailure::Resolution(error)) => {
            liker_warn!("Job {} could not resolve ids: {}", job_id, error);
            BatchResultKind::ResolutionFailed {
                reason: error.to_string(),
            }
        }
        Err(BatchFailure::Chunk {
            chunk_index,
            items_applied,
            items_not_applied,
            error,
        }) => {
            liker_warn!(
                "Job {} partially applied: {} applied, {} not applied",
                job_id,
                items_applied,
                items_not_applied
            );
            BatchResultKind::PartiallyApplied {
                items_applied,
                items_not_applied,
                failed_chunk: chunk_index,
                reason: error.to_string(),
            }
        }
    }
}
