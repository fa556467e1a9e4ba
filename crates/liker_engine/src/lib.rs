//! Company liker engine: backend gateway, chunked like runs and the
//! background executor that turns effects into gateway calls.
mod batch;
mod engine;
mod gateway;
mod types;

pub use batch::{BatchMutationEngine, ChannelProgressSink, ProgressSink, DEFAULT_BATCH_SIZE};
pub use engine::EngineHandle;
pub use gateway::{Gateway, GatewaySettings, HttpGateway};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    BatchFailure, BatchOutcome, BatchProgress, BatchSource, CollectionMetadata, CollectionPage,
    Company, CompanyBatch, CompanyId, EngineEvent, FailureKind, GatewayError, JobId, Mutation,
    PageQuery,
};
