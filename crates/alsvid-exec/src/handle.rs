//! Job lifecycle: submission, polling, result resolution.
//!
//! The job state machine:
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                  │           │
//!                  └───────────┴──→ Failed(reason)
//! ```
//!
//! **Invariants:**
//! - Transitions are monotonic — the server never moves a job backward.
//! - A status string outside the recognized set is a failure, not something
//!   to keep polling on.
//! - Results are fetched only after `Completed` is observed, in work-item
//!   submission order.
//! - A wait timeout consumes no polling state; `wait()` can be called again.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use alsvid_qaas::{CreateJobRequest, JobResultEntry};

use crate::api::RemoteApi;
use crate::error::{ExecError, ExecResult};
use crate::executor::SessionId;

/// How long to wait between job status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Classified status of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Waiting in the session queue.
    Queued,
    /// Currently executing.
    Running,
    /// Completed successfully; results can be fetched.
    Completed,
    /// Failed, or reported a status outside the recognized set.
    Failed(String),
}

impl JobStatus {
    /// Map a wire status string onto the state machine.
    pub fn from_wire(status: &str, progress_message: Option<String>) -> Self {
        match status.to_lowercase().as_str() {
            "waiting" => JobStatus::Queued,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "error" => JobStatus::Failed(
                progress_message.unwrap_or_else(|| "job error".to_string()),
            ),
            other => JobStatus::Failed(match progress_message {
                Some(message) => format!("unrecognized status \"{other}\": {message}"),
                None => format!("unrecognized status \"{other}\""),
            }),
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed(_))
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
        }
    }
}

/// Raw payloads of a completed job.
///
/// A single work item yields `Single`; a batch yields `Batch` with one
/// payload per work item, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutput {
    /// Result of a one-item job.
    Single(Vec<u8>),
    /// Results of a batch job, in submission order.
    Batch(Vec<Vec<u8>>),
}

impl JobOutput {
    fn from_payloads(mut payloads: Vec<Vec<u8>>) -> Self {
        if payloads.len() == 1 {
            JobOutput::Single(payloads.swap_remove(0))
        } else {
            JobOutput::Batch(payloads)
        }
    }

    /// Number of payloads.
    pub fn len(&self) -> usize {
        match self {
            JobOutput::Single(_) => 1,
            JobOutput::Batch(payloads) => payloads.len(),
        }
    }

    /// Whether the job produced no payloads.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a payload list regardless of arity.
    pub fn into_vec(self) -> Vec<Vec<u8>> {
        match self {
            JobOutput::Single(payload) => vec![payload],
            JobOutput::Batch(payloads) => payloads,
        }
    }

    /// The payload of a one-item job, or `None` for a batch.
    pub fn into_single(self) -> Option<Vec<u8>> {
        match self {
            JobOutput::Single(payload) => Some(payload),
            JobOutput::Batch(_) => None,
        }
    }
}

/// Handle to one execution request.
///
/// Exclusively owned by its creator; run several jobs concurrently by
/// spawning one task per handle.
pub struct JobHandle {
    /// API seam.
    api: Arc<dyn RemoteApi>,
    /// Job name.
    name: String,
    /// Model envelope JSON, uploaded on submit.
    payload: String,
    /// Run parameters JSON, attached to the job.
    parameters: String,
    /// Number of work items in the batch.
    work_count: usize,
    /// Status poll interval.
    poll_interval: Duration,
    /// Assigned job ID; `None` until submitted.
    job_id: Option<JobId>,
}

impl JobHandle {
    pub(crate) fn new(
        api: Arc<dyn RemoteApi>,
        name: String,
        payload: String,
        parameters: String,
        work_count: usize,
    ) -> Self {
        Self {
            api,
            name,
            payload,
            parameters,
            work_count,
            poll_interval: DEFAULT_POLL_INTERVAL,
            job_id: None,
        }
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the job name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the assigned job ID, if submitted.
    pub fn id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    /// Number of work items in the batch.
    pub fn work_count(&self) -> usize {
        self.work_count
    }

    fn require_id(&self) -> ExecResult<&JobId> {
        self.job_id.as_ref().ok_or(ExecError::NotSubmitted)
    }

    /// Upload the model and create the job inside a session.
    ///
    /// Calling this on an already-submitted handle is a programming error:
    /// it fails with [`ExecError::AlreadySubmitted`] before any network
    /// round-trip.
    #[instrument(skip(self), fields(name = %self.name, session = %session))]
    pub async fn submit(&mut self, session: &SessionId) -> ExecResult<JobId> {
        if let Some(id) = &self.job_id {
            return Err(ExecError::AlreadySubmitted(id.0.clone()));
        }

        let model = self.api.create_model(&self.payload).await?;
        debug!("Model uploaded: {}", model.id);

        let request = CreateJobRequest {
            name: self.name.clone(),
            session_id: session.0.clone(),
            model_id: model.id,
            parameters: Some(self.parameters.clone()),
            tags: Some(vec!["alsvid".into()]),
            max_duration: None,
        };
        let job = self.api.create_job(&request).await?;
        info!("Job submitted: {} (status: {})", job.id, job.status);

        let id = JobId(job.id);
        self.job_id = Some(id.clone());
        Ok(id)
    }

    /// Query the current job status.
    pub async fn status(&self) -> ExecResult<JobStatus> {
        let job_id = self.require_id()?;
        let job = self.api.get_job(&job_id.0).await?;
        Ok(JobStatus::from_wire(&job.status, job.progress_message))
    }

    /// Block until the job completes, then fetch and resolve its results.
    ///
    /// Polls on a fixed interval until a terminal status. With a timeout,
    /// elapsed time is checked before each status query. The job may still
    /// complete server-side after a [`ExecError::Timeout`]; a later `wait()`
    /// call picks it up where the server is.
    #[instrument(skip(self), fields(job_id))]
    pub async fn wait(&self, timeout: Option<Duration>) -> ExecResult<JobOutput> {
        let job_id = self.require_id()?.clone();
        tracing::Span::current().record("job_id", job_id.0.as_str());
        let start = Instant::now();

        loop {
            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    return Err(ExecError::Timeout {
                        job_id: job_id.0.clone(),
                        waited: start.elapsed(),
                    });
                }
            }

            match self.status().await? {
                JobStatus::Completed => break,
                JobStatus::Failed(message) => {
                    return Err(ExecError::JobFailed {
                        job_id: job_id.0.clone(),
                        message,
                    });
                }
                status @ (JobStatus::Queued | JobStatus::Running) => {
                    debug!(
                        "Job {} status: {} — waiting {}s",
                        job_id,
                        status,
                        self.poll_interval.as_secs()
                    );
                    sleep(self.poll_interval).await;
                }
            }
        }

        let entries = self.api.list_job_results(&job_id.0).await?;
        let mut payloads = Vec::with_capacity(entries.len());
        for entry in &entries {
            payloads.push(resolve_result(self.api.as_ref(), entry).await?);
        }

        Ok(JobOutput::from_payloads(payloads))
    }
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("name", &self.name)
            .field("job_id", &self.job_id)
            .field("work_count", &self.work_count)
            .finish()
    }
}

/// Resolve one result record into its raw payload.
///
/// Inline data wins; otherwise the presigned URL is dereferenced with a
/// single unauthenticated GET. Neither present is a hard error.
async fn resolve_result(api: &dyn RemoteApi, entry: &JobResultEntry) -> ExecResult<Vec<u8>> {
    if let Some(data) = entry.result.as_deref() {
        if !data.is_empty() {
            return Ok(data.as_bytes().to_vec());
        }
    }

    match entry.url.as_deref() {
        Some(url) if !url.is_empty() => Ok(api.fetch_url(url).await?),
        _ => Err(ExecError::EmptyResult),
    }
}
