//! The seam between orchestration and the wire client.
//!
//! [`RemoteApi`] covers exactly the calls the executor and job handles make.
//! The production implementation delegates to
//! [`QaasClient`](alsvid_qaas::QaasClient); tests script an in-memory
//! implementation to drive the poller through arbitrary status sequences.

use async_trait::async_trait;

use alsvid_qaas::{
    CreateJobRequest, CreateSessionRequest, Job, JobResultEntry, Model, QaasClient,
    QaasResult, Session,
};

/// Remote operations needed for the session/job lifecycle.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Lease a session (idempotent per deduplication ID, server-side).
    async fn create_session(&self, request: &CreateSessionRequest) -> QaasResult<Session>;

    /// Get session status.
    async fn get_session(&self, session_id: &str) -> QaasResult<Session>;

    /// Request graceful session shutdown.
    async fn terminate_session(&self, session_id: &str) -> QaasResult<Session>;

    /// Delete a session.
    async fn delete_session(&self, session_id: &str) -> QaasResult<()>;

    /// Upload a work payload.
    async fn create_model(&self, payload: &str) -> QaasResult<Model>;

    /// Create a job referencing a session and a model.
    async fn create_job(&self, request: &CreateJobRequest) -> QaasResult<Job>;

    /// Get job status.
    async fn get_job(&self, job_id: &str) -> QaasResult<Job>;

    /// List results of a completed job, in submission order.
    async fn list_job_results(&self, job_id: &str) -> QaasResult<Vec<JobResultEntry>>;

    /// Fetch an offloaded result blob from its presigned URL, without auth.
    async fn fetch_url(&self, url: &str) -> QaasResult<Vec<u8>>;
}

#[async_trait]
impl RemoteApi for QaasClient {
    async fn create_session(&self, request: &CreateSessionRequest) -> QaasResult<Session> {
        QaasClient::create_session(self, request).await
    }

    async fn get_session(&self, session_id: &str) -> QaasResult<Session> {
        QaasClient::get_session(self, session_id).await
    }

    async fn terminate_session(&self, session_id: &str) -> QaasResult<Session> {
        QaasClient::terminate_session(self, session_id).await
    }

    async fn delete_session(&self, session_id: &str) -> QaasResult<()> {
        QaasClient::delete_session(self, session_id).await
    }

    async fn create_model(&self, payload: &str) -> QaasResult<Model> {
        QaasClient::create_model(self, payload).await
    }

    async fn create_job(&self, request: &CreateJobRequest) -> QaasResult<Job> {
        QaasClient::create_job(self, request).await
    }

    async fn get_job(&self, job_id: &str) -> QaasResult<Job> {
        QaasClient::get_job(self, job_id).await
    }

    async fn list_job_results(&self, job_id: &str) -> QaasResult<Vec<JobResultEntry>> {
        QaasClient::list_job_results(self, job_id).await
    }

    async fn fetch_url(&self, url: &str) -> QaasResult<Vec<u8>> {
        self.fetch_result(url).await
    }
}
