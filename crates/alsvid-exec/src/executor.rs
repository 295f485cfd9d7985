//! Session orchestration and job submission.
//!
//! An [`Executor`] targets one platform and drives the full lifecycle:
//! lease a session (explicitly, or implicitly per submission), upload the
//! model envelope, create the job, hand back a [`JobHandle`].
//!
//! Sessions are leased resources: the server reclaims them after
//! `max_duration` or `max_idle_duration`. Client-side cleanup is best-effort
//! on top of that backstop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use alsvid_qaas::{CreateSessionRequest, Platform, QaasClient, Session, wire_duration};

use crate::api::RemoteApi;
use crate::error::{ExecError, ExecResult};
use crate::handle::JobHandle;
use crate::options::RunOptions;
use crate::payload::ModelEnvelope;
use crate::work::{PlatformFamily, WorkItem};

/// Default hard session lifetime.
pub const DEFAULT_SESSION_MAX_DURATION: Duration = Duration::from_secs(59 * 60);

/// Default idle session lifetime.
pub const DEFAULT_SESSION_MAX_IDLE_DURATION: Duration = Duration::from_secs(20 * 60);

/// Unique identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Parameters for leasing a session.
#[derive(Debug, Clone)]
pub struct SessionSpec {
    /// Session name.
    pub name: String,
    /// Idempotency key; a live session with the same key is reused.
    pub deduplication_id: String,
    /// Hard lifetime.
    pub max_duration: Duration,
    /// Idle lifetime, reset on activity.
    pub max_idle_duration: Duration,
}

impl SessionSpec {
    /// Default spec for a platform family.
    ///
    /// Name and deduplication key match, so repeated default leases on the
    /// same platform fold into one server-side session.
    pub fn for_family(family: &PlatformFamily) -> Self {
        let name = format!("alsvid-{}-session", family.slug());
        Self {
            deduplication_id: name.clone(),
            name,
            max_duration: DEFAULT_SESSION_MAX_DURATION,
            max_idle_duration: DEFAULT_SESSION_MAX_IDLE_DURATION,
        }
    }

    /// Set the session name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the deduplication key.
    pub fn with_deduplication_id(mut self, id: impl Into<String>) -> Self {
        self.deduplication_id = id.into();
        self
    }

    /// Set the lifetimes.
    pub fn with_durations(mut self, max: Duration, max_idle: Duration) -> Self {
        self.max_duration = max;
        self.max_idle_duration = max_idle;
        self
    }
}

/// Facade driving work execution on one platform.
pub struct Executor {
    /// API seam.
    api: Arc<dyn RemoteApi>,
    /// Platform descriptor, owned by the caller's selection logic.
    platform: Platform,
    /// Family tag derived from the platform.
    family: PlatformFamily,
    /// Defaults for implicit and explicit session leases.
    session_defaults: SessionSpec,
}

impl Executor {
    /// Create an executor backed by the production client.
    pub fn new(client: QaasClient, platform: Platform) -> Self {
        Self::with_api(Arc::new(client), platform)
    }

    /// Create an executor over any [`RemoteApi`] implementation.
    pub fn with_api(api: Arc<dyn RemoteApi>, platform: Platform) -> Self {
        let family =
            PlatformFamily::from_backend_name(platform.backend_name.as_deref().unwrap_or(""));
        let session_defaults = SessionSpec::for_family(&family);

        Self {
            api,
            platform,
            family,
            session_defaults,
        }
    }

    /// Override the session defaults.
    pub fn with_session_defaults(mut self, defaults: SessionSpec) -> Self {
        self.session_defaults = defaults;
        self
    }

    /// The platform this executor targets.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The platform's family tag.
    pub fn family(&self) -> &PlatformFamily {
        &self.family
    }

    /// Default run options for this platform's family.
    pub fn default_options(&self) -> RunOptions {
        RunOptions::for_family(&self.family)
    }

    /// The session defaults in effect.
    pub fn session_defaults(&self) -> &SessionSpec {
        &self.session_defaults
    }

    // ─── Session lifecycle ──────────────────────────────────────────

    /// Lease a session with the default spec.
    pub async fn start_session(&self) -> ExecResult<SessionId> {
        self.start_session_with(self.session_defaults.clone()).await
    }

    /// Lease a session.
    ///
    /// Leasing is idempotent per deduplication key: the server hands back
    /// the live session already associated with the key, if any.
    #[instrument(skip(self, spec), fields(platform = %self.platform.id))]
    pub async fn start_session_with(&self, spec: SessionSpec) -> ExecResult<SessionId> {
        let request = CreateSessionRequest {
            name: spec.name,
            platform_id: self.platform.id.clone(),
            deduplication_id: spec.deduplication_id,
            max_duration: wire_duration(spec.max_duration),
            max_idle_duration: wire_duration(spec.max_idle_duration),
        };

        let session = self.api.create_session(&request).await?;
        info!("Session leased: {} (status: {})", session.id, session.status);
        Ok(SessionId(session.id))
    }

    /// Get current session state.
    pub async fn session_status(&self, session: &SessionId) -> ExecResult<Session> {
        Ok(self.api.get_session(&session.0).await?)
    }

    /// Request graceful session shutdown. The session stops accepting jobs;
    /// jobs already accepted may still run to completion.
    pub async fn stop_session(&self, session: &SessionId) -> ExecResult<Session> {
        Ok(self.api.terminate_session(&session.0).await?)
    }

    /// Delete a session.
    pub async fn delete_session(&self, session: &SessionId) -> ExecResult<()> {
        Ok(self.api.delete_session(&session.0).await?)
    }

    /// Best-effort terminate + delete. Failures are logged and swallowed;
    /// cleanup never masks a primary result or error.
    pub async fn release_session(&self, session: &SessionId) {
        if let Err(e) = self.api.terminate_session(&session.0).await {
            warn!("Session {} terminate failed: {}", session, e);
        }
        if let Err(e) = self.api.delete_session(&session.0).await {
            warn!("Session {} delete failed: {}", session, e);
        }
    }

    /// Run a scoped workload inside a fresh default session, releasing the
    /// session afterwards whatever the outcome.
    pub async fn with_session<T, F, Fut>(&self, f: F) -> ExecResult<T>
    where
        F: FnOnce(SessionId) -> Fut,
        Fut: Future<Output = ExecResult<T>>,
    {
        let session = self.start_session().await?;
        let outcome = f(session.clone()).await;
        self.release_session(&session).await;
        outcome
    }

    // ─── Submission ─────────────────────────────────────────────────

    /// Submit a batch of work items for execution.
    ///
    /// With `session: None` a session is leased implicitly from the defaults
    /// (under an `auto-` prefixed name). Explicit sessions, created once and
    /// reused across many `run` calls, amortize the lease overhead.
    #[instrument(skip(self, work, options), fields(platform = %self.platform.name, items = work.len()))]
    pub async fn run<W: WorkItem>(
        &self,
        work: &[W],
        session: Option<&SessionId>,
        options: RunOptions,
    ) -> ExecResult<JobHandle> {
        if work.is_empty() {
            return Err(ExecError::InvalidOptions("no work items to run".into()));
        }
        if self.platform.max_circuit_count > 0
            && work.len() > self.platform.max_circuit_count as usize
        {
            return Err(ExecError::BatchTooLarge {
                count: work.len(),
                max: self.platform.max_circuit_count,
            });
        }
        options.validate(&self.platform)?;

        let backend_name = self
            .platform
            .backend_name
            .clone()
            .unwrap_or_else(|| self.family.slug().to_string());
        let envelope = ModelEnvelope::build(
            work,
            &backend_name,
            self.platform.version.as_deref(),
            options.backend_options(),
        )?;

        let mut handle = JobHandle::new(
            self.api.clone(),
            format!("alsvid-{}", Uuid::new_v4()),
            envelope.to_json()?,
            options.to_parameters_json()?,
            work.len(),
        );

        let session_id = match session {
            Some(id) => id.clone(),
            None => {
                let mut spec = self.session_defaults.clone();
                spec.name = format!("auto-{}", spec.name);
                self.start_session_with(spec).await?
            }
        };

        handle.submit(&session_id).await?;
        Ok(handle)
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("platform", &self.platform.id)
            .field("family", &self.family)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedApi;
    use std::sync::atomic::Ordering;

    fn test_platform() -> Platform {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "aer_simulation_pop_c16m128",
            "version": "1.0",
            "max_qubit_count": 34,
            "max_shot_count": 100000,
            "max_circuit_count": 3,
            "backend_name": "aer",
        }))
        .unwrap()
    }

    fn executor(api: Arc<ScriptedApi>) -> Executor {
        Executor::with_api(api, test_platform())
    }

    #[test]
    fn test_family_derived_from_platform() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api);
        assert_eq!(*executor.family(), PlatformFamily::GeneralSimulator);
        assert!(executor.session_defaults().name.contains("aer"));
    }

    #[tokio::test]
    async fn test_run_with_explicit_session() {
        let api = Arc::new(
            ScriptedApi::new(&["completed"])
                .with_results(vec![ScriptedApi::inline_entry("out")]),
        );
        let executor = executor(api.clone());

        let work = vec!["OPENQASM 3.0;".to_string()];
        let handle = executor
            .run(&work, Some(&SessionId("s-explicit".into())), executor.default_options())
            .await
            .unwrap();

        assert!(handle.id().is_some());
        // No implicit lease.
        assert_eq!(api.calls.create_session.load(Ordering::SeqCst), 0);
        assert_eq!(api.calls.create_model.load(Ordering::SeqCst), 1);
        assert_eq!(api.calls.create_job.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_leases_session_when_none_given() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api.clone());

        let work = vec!["OPENQASM 3.0;".to_string()];
        executor
            .run(&work, None, executor.default_options())
            .await
            .unwrap();

        assert_eq!(api.calls.create_session.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_dedup_reuse() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api);

        let first = executor.start_session().await.unwrap();
        let second = executor.start_session().await.unwrap();
        assert_eq!(first, second);

        let other = executor
            .start_session_with(
                SessionSpec::for_family(&PlatformFamily::GeneralSimulator)
                    .with_deduplication_id("different"),
            )
            .await
            .unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_batch_limit_enforced_before_network() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api.clone());

        let work: Vec<String> = (0..4).map(|i| format!("circuit-{i}")).collect();
        let err = executor
            .run(&work, None, executor.default_options())
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::BatchTooLarge { count: 4, max: 3 }));
        assert_eq!(api.calls.create_model.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_shots_rejected() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api);

        let work = vec!["c".to_string()];
        let err = executor
            .run(&work, None, executor.default_options().with_shots(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::InvalidOptions(_)));
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api);

        let work: Vec<String> = Vec::new();
        assert!(executor
            .run(&work, None, executor.default_options())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_with_session_releases_after_failure() {
        let api = Arc::new(ScriptedApi::new(&[]));
        let executor = executor(api.clone());

        let result: ExecResult<()> = executor
            .with_session(|_session| async {
                Err(ExecError::JobFailed {
                    job_id: "j1".into(),
                    message: "boom".into(),
                })
            })
            .await;

        // Primary error preserved, cleanup still ran.
        assert!(matches!(result, Err(ExecError::JobFailed { .. })));
        assert_eq!(api.calls.terminate_session.load(Ordering::SeqCst), 1);
        assert_eq!(api.calls.delete_session.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_session_swallows_cleanup_failure() {
        let api = Arc::new(ScriptedApi::new(&[]).failing_cleanup());
        let executor = executor(api.clone());

        let result = executor.with_session(|_session| async { Ok(42) }).await;

        // Cleanup failed underneath, but the result survives.
        assert_eq!(result.unwrap(), 42);
        assert_eq!(api.calls.terminate_session.load(Ordering::SeqCst), 1);
    }
}
