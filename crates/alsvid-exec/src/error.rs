//! Error types for the execution layer.

use std::time::Duration;
use thiserror::Error;

use alsvid_qaas::QaasError;

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that can occur while orchestrating remote work.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Control-plane call failed. Carries the classified wire error.
    #[error("QaaS API error: {0}")]
    Client(#[from] QaasError),

    /// Job reached an error or unrecognized terminal status.
    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    /// Caller-supplied wait timeout elapsed before completion. The job may
    /// still complete server-side; `wait()` can be called again.
    #[error("Timed out after {waited:?} waiting for job {job_id}")]
    Timeout { job_id: String, waited: Duration },

    /// `submit` was called on a handle that already carries a job ID.
    #[error("Job already submitted (ID: {0})")]
    AlreadySubmitted(String),

    /// `status`/`wait` was called on a handle that was never submitted.
    #[error("Job not yet submitted")]
    NotSubmitted,

    /// A result record had neither inline data nor a download URL.
    #[error("Got result with empty data and url fields")]
    EmptyResult,

    /// A work item could not be serialized.
    #[error("Work encoding error: {0}")]
    Encode(String),

    /// Run options failed validation against the platform limits.
    #[error("Invalid run options: {0}")]
    InvalidOptions(String),

    /// More work items than the platform accepts per job.
    #[error("Batch of {count} work items exceeds platform limit of {max}")]
    BatchTooLarge { count: usize, max: u32 },
}
