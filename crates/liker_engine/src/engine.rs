use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use liker_logging::{liker_debug, liker_info, liker_warn};
use tokio_util::sync::CancellationToken;

use crate::batch::{BatchMutationEngine, ChannelProgressSink};
use crate::{
    BatchSource, EngineEvent, Gateway, GatewayError, GatewaySettings, HttpGateway, JobId,
    Mutation, PageQuery,
};

enum EngineCommand {
    LoadCollections,
    FetchPage(PageQuery),
    FetchCompanies { offset: usize, limit: usize },
    Mutate(Mutation),
    RunBatch {
        job_id: JobId,
        source: BatchSource,
        batch_size: usize,
        cancel: CancellationToken,
    },
}

/// The job currently allowed to send chunks, and the token that stops it.
type ActiveJob = Arc<Mutex<Option<(JobId, CancellationToken)>>>;

/// Runs gateway calls on a background tokio runtime and hands results back
/// as [`EngineEvent`]s, so the caller's loop never blocks on the network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    active_job: ActiveJob,
}

impl EngineHandle {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let gateway = HttpGateway::new(settings)?;
        Ok(Self::with_gateway(Arc::new(gateway)))
    }

    pub fn with_gateway(gateway: Arc<dyn Gateway>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let active_job: ActiveJob = Arc::new(Mutex::new(None));
        let worker_active_job = active_job.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let gateway = gateway.clone();
                let event_tx = event_tx.clone();
                let active_job = worker_active_job.clone();
                runtime.spawn(async move {
                    handle_command(gateway.as_ref(), command, event_tx, &active_job).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            active_job,
        }
    }

    pub fn load_collections(&self) {
        self.send(EngineCommand::LoadCollections);
    }

    pub fn fetch_page(&self, query: PageQuery) {
        self.send(EngineCommand::FetchPage(query));
    }

    pub fn fetch_companies(&self, offset: usize, limit: usize) {
        self.send(EngineCommand::FetchCompanies { offset, limit });
    }

    pub fn mutate(&self, mutation: Mutation) {
        self.send(EngineCommand::Mutate(mutation));
    }

    /// Registers the job's cancellation token before the command leaves, so a
    /// cancel sent right after this call always finds it.
    pub fn run_batch(&self, job_id: JobId, source: BatchSource, batch_size: usize) {
        let cancel = CancellationToken::new();
        *lock_active(&self.active_job) = Some((job_id, cancel.clone()));
        self.send(EngineCommand::RunBatch {
            job_id,
            source,
            batch_size,
            cancel,
        });
    }

    /// Stops the job before its next chunk. Ignored unless `job_id` is running.
    pub fn cancel_batch(&self, job_id: JobId) {
        let guard = lock_active(&self.active_job);
        match guard.as_ref() {
            Some((active_id, token)) if *active_id == job_id => {
                liker_info!("Cancelling job {}", job_id);
                token.cancel();
            }
            _ => liker_debug!("Cancel for job {} ignored: not running", job_id),
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            liker_warn!("Engine thread is gone; command dropped");
        }
    }
}

fn lock_active(
    active_job: &ActiveJob,
) -> std::sync::MutexGuard<'_, Option<(JobId, CancellationToken)>> {
    active_job
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn handle_command(
    gateway: &dyn Gateway,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    active_job: &ActiveJob,
) {
    let event = match command {
        EngineCommand::LoadCollections => {
            EngineEvent::CollectionsLoaded(gateway.read_collections_metadata().await)
        }
        EngineCommand::FetchPage(query) => {
            let result = gateway
                .read_collection(&query.collection_id, query.offset, query.limit)
                .await;
            EngineEvent::PageLoaded { query, result }
        }
        EngineCommand::FetchCompanies { offset, limit } => {
            EngineEvent::CompaniesLoaded(gateway.read_companies(offset, limit).await)
        }
        EngineCommand::Mutate(mutation) => {
            let result = match &mutation {
                Mutation::LikeOne(company_id) => gateway.like_one(*company_id).await,
                Mutation::LikeMany(company_ids) => gateway.like_many(company_ids).await,
                Mutation::ResetAllLiked => gateway.reset_all_liked().await,
            };
            if let Err(err) = &result {
                liker_warn!("Mutation {:?} failed: {}", mutation, err);
            }
            EngineEvent::MutationCompleted { mutation, result }
        }
        EngineCommand::RunBatch {
            job_id,
            source,
            batch_size,
            cancel,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let engine = BatchMutationEngine::new(batch_size);
            let result = engine.run(gateway, job_id, source, &sink, &cancel).await;
            let mut guard = lock_active(active_job);
            if guard
                .as_ref()
                .is_some_and(|(active_id, _)| *active_id == job_id)
            {
                *guard = None;
            }
            drop(guard);
            EngineEvent::BatchFinished { job_id, result }
        }
    };
    let _ = event_tx.send(event);
}
