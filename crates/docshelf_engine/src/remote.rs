use std::time::Duration;

use docshelf_core::{RosterItem, UploadCheck};
use docshelf_logging::{shelf_debug, shelf_info, shelf_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::roster::normalize_roster;
use crate::{FailureKind, RemoteError};

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// GET endpoint returning the roster for `?courseId=`.
    pub roster_endpoint: String,
    /// POST endpoint triggering document processing.
    pub process_endpoint: String,
    /// POST endpoint checking for new Discord uploads.
    pub upload_check_endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            roster_endpoint: "http://127.0.0.1:3000/superdocs".to_string(),
            process_endpoint: "http://127.0.0.1:3000/process".to_string(),
            upload_check_endpoint: "http://127.0.0.1:3000/check-discord-uploads".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// The three remote endpoints the catalog talks to.
#[async_trait::async_trait]
pub trait RemoteService: Send + Sync {
    async fn fetch_roster(&self, course_id: &str) -> Result<Vec<RosterItem>, RemoteError>;

    async fn process_document(&self, doc_id: &str) -> Result<(), RemoteError>;

    async fn check_uploads(&self, external_id: &str) -> Result<UploadCheck, RemoteError>;
}

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    action: &'static str,
    #[serde(rename = "docId")]
    doc_id: &'a str,
}

#[derive(Debug, Serialize)]
struct UploadCheckRequest<'a> {
    #[serde(rename = "googleDocId")]
    google_doc_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UploadCheckResponse {
    success: bool,
    new_uploads: bool,
    upload_count: u64,
    message: Option<String>,
}

impl From<UploadCheckResponse> for UploadCheck {
    fn from(value: UploadCheckResponse) -> Self {
        Self {
            success: value.success,
            new_uploads: value.new_uploads,
            upload_count: value.upload_count,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestRemote {
    settings: RemoteSettings,
    client: reqwest::Client,
}

impl ReqwestRemote {
    pub fn new(settings: RemoteSettings) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RemoteError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<Vec<u8>, RemoteError> {
        let url = parse_endpoint(endpoint)?;
        let body = serde_json::to_vec(payload)
            .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_body(response).await
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RemoteError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RemoteError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl RemoteService for ReqwestRemote {
    async fn fetch_roster(&self, course_id: &str) -> Result<Vec<RosterItem>, RemoteError> {
        let mut url = parse_endpoint(&self.settings.roster_endpoint)?;
        url.query_pairs_mut().append_pair("courseId", course_id);
        shelf_info!("Fetching roster course_id={} url={}", course_id, url);

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let bytes = self.read_body(response).await?;

        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;
        let payload = normalize_roster(&body);
        shelf_debug!("Roster response shape: {}", payload.shape());
        let items = payload.into_items();
        shelf_info!("Roster for {} has {} usable items", course_id, items.len());
        Ok(items)
    }

    async fn process_document(&self, doc_id: &str) -> Result<(), RemoteError> {
        shelf_info!("Requesting processing of document {}", doc_id);
        let payload = ProcessRequest {
            action: "processDocument",
            doc_id,
        };
        let bytes = self
            .post_json(&self.settings.process_endpoint, &payload)
            .await?;
        shelf_info!(
            "Process response for {}: {}",
            doc_id,
            String::from_utf8_lossy(&bytes)
        );
        Ok(())
    }

    async fn check_uploads(&self, external_id: &str) -> Result<UploadCheck, RemoteError> {
        shelf_info!("Checking Discord uploads for {}", external_id);
        let payload = UploadCheckRequest {
            google_doc_id: external_id,
        };
        let bytes = self
            .post_json(&self.settings.upload_check_endpoint, &payload)
            .await?;
        let response: UploadCheckResponse = serde_json::from_slice(&bytes).map_err(|err| {
            shelf_warn!("Upload check response is not valid JSON: {}", err);
            RemoteError::new(FailureKind::Decode, err.to_string())
        })?;
        Ok(response.into())
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, RemoteError> {
    Url::parse(endpoint).map_err(|err| RemoteError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::new(FailureKind::Timeout, err.to_string());
    }
    RemoteError::new(FailureKind::Network, err.to_string())
}
