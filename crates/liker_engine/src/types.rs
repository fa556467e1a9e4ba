use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type CompanyId = i64;
pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    #[serde(rename = "company_name")]
    pub name: String,
    pub liked: bool,
}

/// `GET /companies` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBatch {
    pub companies: Vec<Company>,
    #[serde(default)]
    pub total: Option<usize>,
}

/// `GET /collections/{id}` payload: one page plus the collection's size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub id: String,
    #[serde(rename = "collection_name")]
    pub name: String,
    pub companies: Vec<Company>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub id: String,
    #[serde(rename = "collection_name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub collection_id: String,
    pub offset: usize,
    pub limit: usize,
}

/// Non-batched writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    LikeOne(CompanyId),
    LikeMany(Vec<CompanyId>),
    ResetAllLiked,
}

/// Where a batch job gets its ids from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    Ids(Vec<CompanyId>),
    /// Every id in the collection, fetched unpaginated before the first chunk.
    AllInCollection(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    pub job_id: JobId,
    /// Zero-based index of the chunk that just completed.
    pub chunk_index: usize,
    pub chunk_count: usize,
    pub items_processed: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed {
        items_applied: usize,
    },
    Cancelled {
        items_applied: usize,
        items_not_applied: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchFailure {
    /// The id fetch failed; no chunk was sent.
    #[error("resolving ids failed: {0}")]
    Resolution(GatewayError),
    /// Chunks before `chunk_index` were applied; it and everything after were not.
    #[error("chunk {} failed after {items_applied} items: {error}", .chunk_index + 1)]
    Chunk {
        chunk_index: usize,
        items_applied: usize,
        items_not_applied: usize,
        error: GatewayError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CollectionsLoaded(Result<Vec<CollectionMetadata>, GatewayError>),
    PageLoaded {
        query: PageQuery,
        result: Result<CollectionPage, GatewayError>,
    },
    CompaniesLoaded(Result<CompanyBatch, GatewayError>),
    MutationCompleted {
        mutation: Mutation,
        result: Result<(), GatewayError>,
    },
    BatchResolved {
        job_id: JobId,
        total_items: usize,
    },
    BatchProgress(BatchProgress),
    BatchFinished {
        job_id: JobId,
        result: Result<BatchOutcome, BatchFailure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: FailureKind,
    pub message: String,
}

impl GatewayError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    /// 2xx response whose body says `"status": "error"`.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by backend"),
        }
    }
}
