//! Session orchestration, job polling, and result resolution for QaaS work.
//!
//! This crate turns the wire client from `alsvid-qaas` into a usable
//! execution facade:
//!
//! 1. Lease a **session** (explicitly, or implicitly per submission) — a
//!    time-bounded platform reservation with server-side deduplication.
//! 2. **Run** a batch of work items: the serialized programs are wrapped in
//!    a versioned model envelope, uploaded once, and executed as a job.
//! 3. **Wait** on the returned handle: a fixed-interval poll loop with an
//!    optional timeout, terminal-status classification, and two-tier result
//!    retrieval (inline payloads, or presigned URLs fetched on demand).
//!
//! The crate never interprets what it runs. Work items serialize themselves
//! to bytes; results come back as raw bytes per work item, in submission
//! order, for the caller's decoder.
//!
//! # Example
//!
//! ```ignore
//! use alsvid_exec::{Executor, RunOptions};
//! use alsvid_qaas::QaasClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = QaasClient::from_env()?;
//!     let platform = client
//!         .list_platforms(Some("aer_simulation_pop_c16m128"), None)
//!         .await?
//!         .into_iter()
//!         .next()
//!         .expect("platform exists");
//!
//!     let executor = Executor::new(client, platform);
//!     let session = executor.start_session().await?;
//!
//!     let work = vec!["OPENQASM 3.0; ...".to_string()];
//!     let handle = executor
//!         .run(&work, Some(&session), executor.default_options().with_shots(1000))
//!         .await?;
//!
//!     let output = handle.wait(None).await?;
//!     println!("{} result payload(s)", output.len());
//!
//!     executor.release_session(&session).await;
//!     Ok(())
//! }
//! ```

mod api;
mod error;
mod executor;
mod handle;
mod options;
mod payload;
mod work;

pub use api::RemoteApi;
pub use error::{ExecError, ExecResult};
pub use executor::{
    DEFAULT_SESSION_MAX_DURATION, DEFAULT_SESSION_MAX_IDLE_DURATION, Executor, SessionId,
    SessionSpec,
};
pub use handle::{DEFAULT_POLL_INTERVAL, JobHandle, JobId, JobOutput, JobStatus};
pub use options::RunOptions;
pub use payload::{
    BackendSection, ClientSection, CompressionFormat, ModelEnvelope, PROTOCOL_VERSION,
    ProgramPayload, SerializationFormat, USER_AGENT, compress_program, decompress_program,
};
pub use work::{PlatformFamily, WorkItem};

// Re-export the wire client for convenience.
pub use alsvid_qaas::{Platform, QaasClient, QaasConfig, QaasError};
