//! Wire-level client for session-based Quantum-as-a-Service REST APIs.
//!
//! The service executes opaque work payloads under a session-based model:
//!
//! 1. Lease a **session** on a platform (`POST /sessions`). Sessions carry a
//!    deduplication key — re-creating with the same key reuses the live
//!    session — and hard/idle lifetimes after which the server reclaims them.
//! 2. Upload the serialized work payload as a **model** (`POST /models`).
//! 3. Create a **job** referencing session + model (`POST /jobs`).
//! 4. Poll `GET /jobs/{id}` until a terminal status.
//! 5. Fetch `GET /jobs/{id}/results` — each entry is inline data or a
//!    presigned storage URL.
//!
//! This crate is transport only: uniform auth, fixed timeouts, classified
//! errors, no retries. Polling loops, payload construction, and session
//! orchestration live in `alsvid-exec`.
//!
//! # Authentication
//!
//! ```bash
//! export ALSVID_SECRET_KEY="your-secret-key"
//! export ALSVID_PROJECT_ID="your-project-id"
//! ```
//!
//! # Example
//!
//! ```ignore
//! use alsvid_qaas::QaasClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), alsvid_qaas::QaasError> {
//!     let client = QaasClient::from_env()?;
//!
//!     let platforms = client.list_platforms(Some("aer_simulation_pop_c16m128"), None).await?;
//!     println!("{} platforms", platforms.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::QaasClient;
pub use config::{DEFAULT_API_URL, ENV_API_URL, ENV_PROJECT_ID, ENV_SECRET_KEY, QaasConfig};
pub use error::{QaasError, QaasResult};
pub use types::{
    CreateJobRequest, CreateModelRequest, CreateSessionRequest, Job, JobResultEntry,
    ListJobResultsResponse, ListPlatformsResponse, Model, Platform, Session,
    UpdateSessionRequest, wire_duration,
};
