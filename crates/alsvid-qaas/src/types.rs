//! Wire types for the QaaS REST API.
//!
//! Request bodies are explicit `Serialize` records, response bodies explicit
//! `Deserialize` records. Status fields stay raw strings at this layer;
//! classification into an execution-level state machine happens above.

// Allow dead code for API response fields that are deserialized but not yet used.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Format a duration the way the API encodes them: whole seconds with an
/// `s` suffix (e.g. `"3540s"`).
pub fn wire_duration(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

// ─── Platforms ──────────────────────────────────────────────────────

/// A compute platform offering (hardware or simulator).
///
/// Read-only: fetched by listing, never mutated by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Platform {
    /// Platform ID.
    pub id: String,
    /// Display name (e.g. "aer_simulation_pop_c16m128").
    pub name: String,
    /// Platform software version.
    #[serde(default)]
    pub version: Option<String>,
    /// Opaque metadata blob.
    #[serde(default)]
    pub metadata: Option<String>,
    /// Maximum number of qubits a work unit may use.
    #[serde(default)]
    pub max_qubit_count: u32,
    /// Maximum number of shots per job.
    #[serde(default)]
    pub max_shot_count: u32,
    /// Maximum number of work units per job.
    #[serde(default)]
    pub max_circuit_count: u32,
    /// Availability state (e.g. "available", "shortage").
    #[serde(default)]
    pub availability: Option<String>,
    /// Underlying technology (e.g. "general_purpose", "trapped_ion").
    #[serde(default)]
    pub technology: Option<String>,
    /// Backend family the platform runs (e.g. "aer", "qsim", "aqt").
    #[serde(default)]
    pub backend_name: Option<String>,
    /// Provider operating the hardware.
    #[serde(default)]
    pub provider_name: Option<String>,
}

/// Response from listing platforms.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPlatformsResponse {
    /// Platform descriptors.
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

// ─── Sessions ───────────────────────────────────────────────────────

/// Parameters for creating a session. The client adds its project scope
/// when building the wire body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    /// Human-readable session name.
    pub name: String,
    /// Platform the session reserves.
    pub platform_id: String,
    /// Idempotency key: a live session with the same deduplication ID is
    /// reused by the server instead of creating a duplicate.
    pub deduplication_id: String,
    /// Hard session lifetime, wire-encoded (e.g. "3540s").
    pub max_duration: String,
    /// Idle lifetime, reset on activity, wire-encoded.
    pub max_idle_duration: String,
}

/// Request body for updating a session.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateSessionRequest {
    /// New session name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New hard lifetime, wire-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
    /// New idle lifetime, wire-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_duration: Option<String>,
}

/// A time-bounded lease on a platform.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Session ID, assigned by the server.
    pub id: String,
    /// Session name.
    #[serde(default)]
    pub name: Option<String>,
    /// Platform the session runs on.
    #[serde(default)]
    pub platform_id: Option<String>,
    /// Session status: starting, running, stopping, stopped.
    pub status: String,
    /// Deduplication key the session was created with.
    #[serde(default)]
    pub deduplication_id: Option<String>,
    /// Hard lifetime, wire-encoded.
    #[serde(default)]
    pub max_duration: Option<String>,
    /// Idle lifetime, wire-encoded.
    #[serde(default)]
    pub max_idle_duration: Option<String>,
    /// Number of jobs waiting in the session queue.
    #[serde(default)]
    pub waiting_job_count: Option<u32>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Start timestamp.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Termination timestamp.
    #[serde(default)]
    pub terminated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check if the session is active and accepting jobs.
    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("running")
    }

    /// Check if the session is starting up.
    pub fn is_starting(&self) -> bool {
        self.status.eq_ignore_ascii_case("starting")
    }

    /// Check if the session has stopped or is shutting down.
    pub fn is_stopped(&self) -> bool {
        matches!(
            self.status.to_lowercase().as_str(),
            "stopped" | "stopping" | "terminated" | "deleted"
        )
    }
}

// ─── Models ─────────────────────────────────────────────────────────

/// Request body for uploading a model.
#[derive(Debug, Clone, Serialize)]
pub struct CreateModelRequest {
    /// Project the model belongs to.
    pub project_id: String,
    /// Serialized work payload. Opaque to the control plane.
    pub payload: String,
}

/// An uploaded work payload, referenced by ID from jobs.
///
/// Immutable once created; there is no update or delete.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    /// Model ID — pass this to job creation.
    pub id: String,
    /// Project the model belongs to.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Storage URL, when the server offloaded the payload.
    #[serde(default)]
    pub url: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ─── Jobs ───────────────────────────────────────────────────────────

/// Request body for creating a job.
#[derive(Debug, Clone, Serialize)]
pub struct CreateJobRequest {
    /// Job name.
    pub name: String,
    /// Session to run the job in.
    pub session_id: String,
    /// Model holding the work payload.
    pub model_id: String,
    /// Execution parameters as a JSON string (shots, options).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    /// Optional tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Maximum job duration, wire-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
}

/// One server-tracked execution request.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Job ID, assigned by the server.
    pub id: String,
    /// Job name.
    #[serde(default)]
    pub name: Option<String>,
    /// Session the job belongs to.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Raw status string: waiting, running, completed, error.
    pub status: String,
    /// Progress message from the platform.
    #[serde(default)]
    pub progress_message: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Start timestamp.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Job {
    /// Check if the job is still pending (waiting or running).
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status.to_lowercase().as_str(),
            "waiting" | "running"
        )
    }

    /// Check if the job completed successfully.
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }

    /// Check if the job reached a failure state. Any status outside the
    /// recognized set counts as failed, so a status contract drift surfaces
    /// as an error instead of an infinite poll.
    pub fn is_failed(&self) -> bool {
        !self.is_pending() && !self.is_completed()
    }
}

// ─── Job results ────────────────────────────────────────────────────

/// One result record of a completed job.
///
/// Exactly one of `result`/`url` is meaningful: a non-empty `result` is the
/// payload itself; otherwise `url` points at a presigned object-storage blob.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResultEntry {
    /// Job the result belongs to.
    #[serde(default)]
    pub job_id: Option<String>,
    /// Inline result payload. Empty when offloaded to storage.
    #[serde(default)]
    pub result: Option<String>,
    /// Presigned download URL for large results.
    #[serde(default)]
    pub url: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobResultEntry {
    /// Whether the payload is embedded directly in this record.
    pub fn has_inline_result(&self) -> bool {
        self.result.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Response from listing job results.
#[derive(Debug, Clone, Deserialize)]
pub struct ListJobResultsResponse {
    /// Total number of result entries.
    #[serde(default)]
    pub total_count: u32,
    /// Result entries, in work-item submission order.
    #[serde(default)]
    pub job_results: Vec<JobResultEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_duration() {
        assert_eq!(wire_duration(Duration::from_secs(3540)), "3540s");
        assert_eq!(wire_duration(Duration::from_secs(0)), "0s");
        // Sub-second precision is truncated; the API only takes whole seconds.
        assert_eq!(wire_duration(Duration::from_millis(1500)), "1s");
    }

    #[test]
    fn test_create_session_request_serialization() {
        let request = CreateSessionRequest {
            name: "t1".into(),
            platform_id: "plat-1".into(),
            deduplication_id: "d1".into(),
            max_duration: wire_duration(Duration::from_secs(300)),
            max_idle_duration: wire_duration(Duration::from_secs(300)),
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
        assert_eq!(json["name"], "t1");
        assert_eq!(json["platform_id"], "plat-1");
        assert_eq!(json["deduplication_id"], "d1");
        assert_eq!(json["max_duration"], "300s");
        assert_eq!(json["max_idle_duration"], "300s");
    }

    #[test]
    fn test_update_session_request_skips_unset_fields() {
        let request = UpdateSessionRequest {
            name: None,
            max_duration: Some("600s".into()),
            max_idle_duration: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("max_duration"));
        assert!(!json.contains("name"));
        assert!(!json.contains("max_idle_duration"));
    }

    #[test]
    fn test_session_deserialization() {
        let session: Session = serde_json::from_str(
            r#"{
                "id": "s1",
                "name": "t1",
                "status": "running",
                "max_duration": "300s",
                "max_idle_duration": "300s",
                "created_at": "2025-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(session.id, "s1");
        assert!(session.is_running());
        assert!(!session.is_stopped());
        assert!(session.created_at.is_some());
    }

    #[test]
    fn test_session_status_helpers() {
        let mut session: Session =
            serde_json::from_str(r#"{"id": "s1", "status": "starting"}"#).unwrap();
        assert!(session.is_starting());

        session.status = "stopping".into();
        assert!(session.is_stopped());

        session.status = "Running".into();
        assert!(session.is_running());
    }

    #[test]
    fn test_create_job_request_serialization() {
        let request = CreateJobRequest {
            name: "alsvid-j1".into(),
            session_id: "s1".into(),
            model_id: "m1".into(),
            parameters: Some(r#"{"shots":1000,"options":{}}"#.into()),
            tags: Some(vec!["alsvid".into()]),
            max_duration: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"session_id\":\"s1\""));
        assert!(json.contains("\"model_id\":\"m1\""));
        assert!(json.contains("shots"));
        // Model-based protocol: no inline circuit field.
        assert!(!json.contains("circuit"));
        assert!(!json.contains("max_duration"));
    }

    #[test]
    fn test_job_status_helpers() {
        let mut job: Job =
            serde_json::from_str(r#"{"id": "j1", "status": "waiting"}"#).unwrap();
        assert!(job.is_pending());
        assert!(!job.is_completed());
        assert!(!job.is_failed());

        job.status = "completed".into();
        assert!(job.is_completed());

        job.status = "error".into();
        assert!(job.is_failed());

        // Unrecognized status is failure, not pending.
        job.status = "snoozing".into();
        assert!(job.is_failed());
        assert!(!job.is_pending());
    }

    #[test]
    fn test_job_results_deserialization() {
        let response: ListJobResultsResponse = serde_json::from_str(
            r#"{
                "total_count": 2,
                "job_results": [
                    {"job_id": "j1", "result": "payload-a", "url": ""},
                    {"job_id": "j1", "result": "", "url": "http://store/r1"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(response.job_results.len(), 2);
        assert!(response.job_results[0].has_inline_result());
        assert!(!response.job_results[1].has_inline_result());
    }

    #[test]
    fn test_platform_deserialization() {
        let platform: Platform = serde_json::from_str(
            r#"{
                "id": "p1",
                "name": "aer_simulation_pop_c16m128",
                "version": "1.0",
                "max_qubit_count": 34,
                "max_shot_count": 100000,
                "max_circuit_count": 100,
                "availability": "available",
                "backend_name": "aer",
                "provider_name": "quantum_cloud"
            }"#,
        )
        .unwrap();

        assert_eq!(platform.max_qubit_count, 34);
        assert_eq!(platform.backend_name.as_deref(), Some("aer"));
    }
}
