//! Multipart transfer to the gateway.

use std::time::Instant;

use facelens_models::{CompareFacesResult, FaceDetail, UploadFile, UploadPolicy};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::candidate::UploadCandidate;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::upload_state::{UploadGate, UploadState};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Client for the gateway's detect and compare endpoints.
///
/// Clones share the same upload gate.
#[derive(Debug, Clone)]
pub struct TransferClient {
    http: Client,
    config: ClientConfig,
    policy: UploadPolicy,
    gate: UploadGate,
}

impl TransferClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let policy = config.policy()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("facelens-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            config,
            policy,
            gate: UploadGate::new(),
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn gate(&self) -> &UploadGate {
        &self.gate
    }

    pub fn upload_state(&self) -> UploadState {
        self.gate.state()
    }

    /// Upload one image and return the faces found in it.
    pub async fn detect(&self, image: &UploadCandidate) -> ClientResult<Vec<FaceDetail>> {
        let _permit = self.gate.begin()?;
        let form = Form::new().part("file", part(image)?);
        self.post("detect", form).await
    }

    /// Upload a source and a target image and return their comparison.
    pub async fn compare(
        &self,
        source: &UploadCandidate,
        target: &UploadCandidate,
    ) -> ClientResult<CompareFacesResult> {
        let _permit = self.gate.begin()?;
        let form = Form::new()
            .part("source-file", part(source)?)
            .part("target-file", part(target)?);
        self.post("compare", form).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: Form) -> ClientResult<T> {
        let url = self.config.endpoint(path);
        let start = Instant::now();
        debug!(url = %url, "Uploading to gateway");

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::handle_error_response(status, &url, response).await);
        }

        let body = response.bytes().await?;
        let parsed = serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", url, e)))?;

        info!(
            url = %url,
            duration_ms = start.elapsed().as_millis() as u64,
            "Gateway request completed"
        );
        Ok(parsed)
    }

    async fn handle_error_response(status: StatusCode, url: &str, response: reqwest::Response) -> ClientError {
        let body = response.text().await.unwrap_or_default();

        if status.is_client_error() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                warn!(url = %url, kind = %envelope.error.kind, "Gateway rejected upload");
                return ClientError::Rejected {
                    kind: envelope.error.kind,
                    message: envelope.error.message,
                };
            }
        }

        warn!(url = %url, status = status.as_u16(), body = %body, "Gateway request failed");
        ClientError::Status(status.as_u16())
    }
}

fn part(candidate: &UploadCandidate) -> ClientResult<Part> {
    Part::bytes(candidate.bytes().to_vec())
        .file_name(candidate.name().to_string())
        .mime_str(candidate.mime_type())
        .map_err(|e| ClientError::InvalidFile(format!("{}: {}", candidate.name(), e)))
}
