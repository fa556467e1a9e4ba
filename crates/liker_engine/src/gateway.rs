use std::time::Duration;

use liker_logging::{liker_debug, liker_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    CollectionMetadata, CollectionPage, CompanyBatch, CompanyId, FailureKind, GatewayError,
};

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The backend. Owns the liked state; every call is one request/response and
/// any non-success answer comes back as a [`GatewayError`].
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn read_companies(&self, offset: usize, limit: usize)
        -> Result<CompanyBatch, GatewayError>;

    async fn read_collection(
        &self,
        collection_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<CollectionPage, GatewayError>;

    async fn read_collections_metadata(&self) -> Result<Vec<CollectionMetadata>, GatewayError>;

    /// Every id in the collection, unpaginated.
    async fn read_all_identifiers(&self, collection_id: &str)
        -> Result<Vec<CompanyId>, GatewayError>;

    async fn like_one(&self, company_id: CompanyId) -> Result<(), GatewayError>;

    /// "Selected rows" path: one request, no batching.
    async fn like_many(&self, company_ids: &[CompanyId]) -> Result<(), GatewayError>;

    /// Per-chunk call of the batch engine. Same effect as [`Gateway::like_many`],
    /// separate endpoint.
    async fn like_many_batch(&self, company_ids: &[CompanyId]) -> Result<(), GatewayError>;

    async fn reset_all_liked(&self) -> Result<(), GatewayError>;
}

#[derive(Debug, Serialize)]
struct CompanyIdsBody<'a> {
    company_ids: &'a [CompanyId],
}

/// Envelope some write endpoints answer with. Only an explicit `"error"`
/// status counts as a failure.
#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    added_count: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| GatewayError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GatewayError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn paged_endpoint(&self, segments: &[&str], offset: usize, limit: usize) -> Url {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        liker_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = read_success_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| GatewayError::new(FailureKind::Decode, err.to_string()))
    }

    async fn post(&self, url: Url, ids: Option<&[CompanyId]>) -> Result<(), GatewayError> {
        liker_debug!(
            "POST {} ids={}",
            url,
            ids.map(<[CompanyId]>::len).unwrap_or(0)
        );
        let mut request = self.client.post(url);
        if let Some(company_ids) = ids {
            let body = serde_json::to_vec(&CompanyIdsBody { company_ids })
                .map_err(|err| GatewayError::new(FailureKind::Decode, err.to_string()))?;
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;
        let body = read_success_body(response).await?;
        check_status_body(&body)
    }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    async fn read_companies(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<CompanyBatch, GatewayError> {
        self.get_json(self.paged_endpoint(&["companies"], offset, limit))
            .await
    }

    async fn read_collection(
        &self,
        collection_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<CollectionPage, GatewayError> {
        self.get_json(self.paged_endpoint(&["collections", collection_id], offset, limit))
            .await
    }

    async fn read_collections_metadata(&self) -> Result<Vec<CollectionMetadata>, GatewayError> {
        self.get_json(self.endpoint(&["collections"])).await
    }

    async fn read_all_identifiers(
        &self,
        collection_id: &str,
    ) -> Result<Vec<CompanyId>, GatewayError> {
        self.get_json(self.endpoint(&["collections", collection_id, "all-ids"]))
            .await
    }

    async fn like_one(&self, company_id: CompanyId) -> Result<(), GatewayError> {
        let id = company_id.to_string();
        self.post(self.endpoint(&["companies", &id, "like"]), None)
            .await
    }

    async fn like_many(&self, company_ids: &[CompanyId]) -> Result<(), GatewayError> {
        self.post(self.endpoint(&["companies", "bulk-like"]), Some(company_ids))
            .await
    }

    async fn like_many_batch(&self, company_ids: &[CompanyId]) -> Result<(), GatewayError> {
        self.post(
            self.endpoint(&["companies", "bulk-like-all"]),
            Some(company_ids),
        )
        .await
    }

    async fn reset_all_liked(&self) -> Result<(), GatewayError> {
        self.post(self.endpoint(&["companies", "reset-liked-companies"]), None)
            .await
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    Ok(bytes.to_vec())
}

fn check_status_body(body: &[u8]) -> Result<(), GatewayError> {
    // Write endpoints may answer with an empty or non-JSON body; that is a success.
    let Ok(parsed) = serde_json::from_slice::<StatusBody>(body) else {
        return Ok(());
    };
    if parsed.status.as_deref() == Some("error") {
        let message = parsed
            .message
            .unwrap_or_else(|| "backend reported an error".to_string());
        liker_warn!("Backend rejected write: {}", message);
        return Err(GatewayError::new(FailureKind::Rejected, message));
    }
    if let Some(added) = parsed.added_count {
        liker_debug!("Backend added {} new likes", added);
    }
    Ok(())
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::new(FailureKind::Timeout, err.to_string());
    }
    GatewayError::new(FailureKind::Network, err.to_string())
}
