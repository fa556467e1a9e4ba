#![allow(dead_code)]

use std::sync::Mutex;

use liker_engine::{
    CancellationToken, CollectionMetadata, CollectionPage, CompanyBatch, CompanyId, EngineEvent,
    FailureKind, Gateway, GatewayError, ProgressSink,
};

pub fn gateway_error(kind: FailureKind) -> GatewayError {
    GatewayError {
        message: kind.to_string(),
        kind,
    }
}

/// In-memory backend that records every chunk it receives.
#[derive(Default)]
pub struct RecordingGateway {
    pub all_ids: Vec<CompanyId>,
    pub fail_resolution: bool,
    /// 1-based chunk call that fails.
    pub fail_on_chunk: Option<usize>,
    /// Trips this token once the given number of chunks went through.
    pub cancel_after: Option<(usize, CancellationToken)>,
    pub chunks: Mutex<Vec<Vec<CompanyId>>>,
    pub other_calls: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn with_ids(ids: impl IntoIterator<Item = CompanyId>) -> Self {
        Self {
            all_ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn chunks(&self) -> Vec<Vec<CompanyId>> {
        self.chunks.lock().unwrap().clone()
    }

    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunks().iter().map(Vec::len).collect()
    }

    pub fn other_calls(&self) -> Vec<String> {
        self.other_calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.other_calls.lock().unwrap().push(call.into());
    }
}

#[async_trait::async_trait]
impl Gateway for RecordingGateway {
    async fn read_companies(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<CompanyBatch, GatewayError> {
        self.record(format!("read_companies {offset} {limit}"));
        Ok(CompanyBatch {
            companies: Vec::new(),
            total: Some(0),
        })
    }

    async fn read_collection(
        &self,
        collection_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<CollectionPage, GatewayError> {
        self.record(format!("read_collection {collection_id} {offset} {limit}"));
        Ok(CollectionPage {
            id: collection_id.to_string(),
            name: collection_id.to_string(),
            companies: Vec::new(),
            total: self.all_ids.len(),
        })
    }

    async fn read_collections_metadata(&self) -> Result<Vec<CollectionMetadata>, GatewayError> {
        self.record("read_collections_metadata");
        Ok(Vec::new())
    }

    async fn read_all_identifiers(
        &self,
        collection_id: &str,
    ) -> Result<Vec<CompanyId>, GatewayError> {
        self.record(format!("read_all_identifiers {collection_id}"));
        if self.fail_resolution {
            return Err(gateway_error(FailureKind::Network));
        }
        Ok(self.all_ids.clone())
    }

    async fn like_one(&self, company_id: CompanyId) -> Result<(), GatewayError> {
        self.record(format!("like_one {company_id}"));
        Ok(())
    }

    async fn like_many(&self, company_ids: &[CompanyId]) -> Result<(), GatewayError> {
        self.record(format!("like_many {}", company_ids.len()));
        Ok(())
    }

    async fn like_many_batch(&self, company_ids: &[CompanyId]) -> Result<(), GatewayError> {
        let call = {
            let mut chunks = self.chunks.lock().unwrap();
            chunks.push(company_ids.to_vec());
            chunks.len()
        };
        if self.fail_on_chunk == Some(call) {
            return Err(gateway_error(FailureKind::HttpStatus(502)));
        }
        if let Some((after, token)) = &self.cancel_after {
            if call == *after {
                token.cancel();
            }
        }
        Ok(())
    }

    async fn reset_all_liked(&self) -> Result<(), GatewayError> {
        self.record("reset_all_liked");
        Ok(())
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
