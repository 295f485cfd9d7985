//! QaaS REST API client.
//!
//! Thin authenticated transport over the control plane:
//!
//! 1. `POST /sessions` → lease a platform (deduplicated server-side)
//! 2. `POST /models` → upload the serialized work payload
//! 3. `POST /jobs` with `model_id` + parameters → get `job.id`
//! 4. `GET /jobs/{id}` until a terminal status
//! 5. `GET /jobs/{id}/results` → inline payloads or presigned URLs
//!
//! Every request carries `X-Auth-Token` and a fixed timeout. There is no
//! retry logic at this layer; callers decide what is retryable from the
//! classified [`QaasError`](crate::QaasError) variants.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::QaasConfig;
use crate::error::{QaasError, QaasResult};
use crate::types::{
    CreateJobRequest, CreateModelRequest, CreateSessionRequest, Job, JobResultEntry,
    ListJobResultsResponse, ListPlatformsResponse, Model, Platform, Session,
    UpdateSessionRequest,
};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication header carried on every control-plane request.
const AUTH_HEADER: &str = "X-Auth-Token";

/// QaaS control-plane client.
///
/// Cheap to clone; concurrent use from multiple polling loops is safe since
/// the only state is read-only configuration.
#[derive(Clone)]
pub struct QaasClient {
    /// HTTP client.
    client: Client,
    /// API base URL, without trailing slash.
    base_url: String,
    /// Secret key (sent as `X-Auth-Token`).
    secret_key: String,
    /// Project ID.
    project_id: String,
}

impl std::fmt::Debug for QaasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaasClient")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl QaasClient {
    /// Create a new client from a configuration.
    pub fn new(config: QaasConfig) -> QaasResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(QaasError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key,
            project_id: config.project_id,
        })
    }

    /// Create a client from `ALSVID_*` environment variables.
    pub fn from_env() -> QaasResult<Self> {
        Self::new(QaasConfig::from_env()?)
    }

    /// Get the project ID this client is scoped to.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ─── Request helpers ────────────────────────────────────────────

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> QaasResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, &self.secret_key)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> QaasResult<T> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(AUTH_HEADER, &self.secret_key)
            .json(body)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn patch<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> QaasResult<T> {
        let url = self.url(path);
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(&url)
            .header(AUTH_HEADER, &self.secret_key)
            .json(body)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn delete(&self, path: &str) -> QaasResult<()> {
        let url = self.url(path);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header(AUTH_HEADER, &self.secret_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(classify_status(status, message))
        }
    }

    // ─── Platforms ──────────────────────────────────────────────────

    /// List platforms, optionally filtered by name and provider.
    #[instrument(skip(self))]
    pub async fn list_platforms(
        &self,
        name: Option<&str>,
        provider_name: Option<&str>,
    ) -> QaasResult<Vec<Platform>> {
        let response: ListPlatformsResponse =
            self.get(&platforms_path(name, provider_name)).await?;
        Ok(response.platforms)
    }

    // ─── Session management ─────────────────────────────────────────

    /// Create a session on a platform.
    ///
    /// Creation is idempotent per `deduplication_id`: the server returns the
    /// live session already associated with that key instead of erroring.
    #[instrument(skip(self, request), fields(platform_id = %request.platform_id))]
    pub async fn create_session(&self, request: &CreateSessionRequest) -> QaasResult<Session> {
        let body = serde_json::json!({
            "name": request.name,
            "project_id": self.project_id,
            "platform_id": request.platform_id,
            "deduplication_id": request.deduplication_id,
            "max_duration": request.max_duration,
            "max_idle_duration": request.max_idle_duration,
        });
        self.post("/sessions", &body).await
    }

    /// Get session status.
    #[instrument(skip(self))]
    pub async fn get_session(&self, session_id: &str) -> QaasResult<Session> {
        self.get(&format!("/sessions/{session_id}")).await
    }

    /// Update a session's name or lifetimes.
    #[instrument(skip(self, request))]
    pub async fn update_session(
        &self,
        session_id: &str,
        request: &UpdateSessionRequest,
    ) -> QaasResult<Session> {
        self.patch(&format!("/sessions/{session_id}"), request).await
    }

    /// Request graceful session shutdown. Outstanding jobs already accepted
    /// may still be observed to completion; new jobs are refused.
    #[instrument(skip(self))]
    pub async fn terminate_session(&self, session_id: &str) -> QaasResult<Session> {
        self.post(&format!("/sessions/{session_id}/terminate"), &serde_json::json!({}))
            .await
    }

    /// Delete a session. Safe to call on an already-expired session.
    #[instrument(skip(self))]
    pub async fn delete_session(&self, session_id: &str) -> QaasResult<()> {
        self.delete(&format!("/sessions/{session_id}")).await
    }

    // ─── Model management ───────────────────────────────────────────

    /// Upload a work payload. The returned model ID is passed to
    /// [`create_job`](Self::create_job).
    ///
    /// A 4xx rejection surfaces as [`QaasError::PayloadRejected`]: the
    /// payload must change before a resubmit can succeed.
    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    pub async fn create_model(&self, payload: &str) -> QaasResult<Model> {
        let body = CreateModelRequest {
            project_id: self.project_id.clone(),
            payload: payload.to_string(),
        };

        match self.post("/models", &body).await {
            Err(QaasError::Api { status, message })
                if matches!(status, 400 | 413 | 422) =>
            {
                Err(QaasError::PayloadRejected { status, message })
            }
            other => other,
        }
    }

    // ─── Job management ─────────────────────────────────────────────

    /// Submit a job referencing a previously uploaded model.
    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    pub async fn create_job(&self, request: &CreateJobRequest) -> QaasResult<Job> {
        match self.post("/jobs", request).await {
            Err(QaasError::Api { status, message })
                if matches!(status, 400 | 422) =>
            {
                Err(QaasError::PayloadRejected { status, message })
            }
            other => other,
        }
    }

    /// Get job status.
    #[instrument(skip(self))]
    pub async fn get_job(&self, job_id: &str) -> QaasResult<Job> {
        self.get(&format!("/jobs/{job_id}")).await
    }

    /// List results for a completed job, in work-item submission order.
    #[instrument(skip(self))]
    pub async fn list_job_results(&self, job_id: &str) -> QaasResult<Vec<JobResultEntry>> {
        let response: ListJobResultsResponse =
            self.get(&format!("/jobs/{job_id}/results")).await?;
        Ok(response.job_results)
    }

    // ─── Result storage ─────────────────────────────────────────────

    /// Fetch an offloaded result blob from its presigned URL.
    ///
    /// The URL is object storage, not the control plane: the request is sent
    /// without the auth header.
    #[instrument(skip(self))]
    pub async fn fetch_result(&self, url: &str) -> QaasResult<Vec<u8>> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(classify_status(status, message))
        }
    }
}

/// Build the `/platforms` path with optional filters.
fn platforms_path(name: Option<&str>, provider_name: Option<&str>) -> String {
    let mut path = String::from("/platforms");
    let mut separator = '?';

    if let Some(name) = name {
        path.push(separator);
        path.push_str("name=");
        path.push_str(name);
        separator = '&';
    }
    if let Some(provider) = provider_name {
        path.push(separator);
        path.push_str("providerName=");
        path.push_str(provider);
    }

    path
}

/// Extract the JSON body of a 2xx response, or classify the failure.
async fn handle_response<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> QaasResult<T> {
    let status = response.status();

    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(classify_status(status, message))
    }
}

/// Map a non-2xx status to an error variant.
fn classify_status(status: StatusCode, message: String) -> QaasError {
    match status {
        StatusCode::UNAUTHORIZED => QaasError::AuthFailed(message),
        StatusCode::NOT_FOUND => QaasError::NotFound(message),
        StatusCode::FORBIDDEN if message.contains("quota") => {
            QaasError::QuotaExceeded(message)
        }
        StatusCode::FORBIDDEN => QaasError::AuthFailed(message),
        _ => QaasError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
