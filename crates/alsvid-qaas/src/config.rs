//! Client configuration.
//!
//! Credentials and endpoint are supplied explicitly or read from the
//! environment:
//!
//! ```bash
//! export ALSVID_SECRET_KEY="your-secret-key"
//! export ALSVID_PROJECT_ID="your-project-id"
//! export ALSVID_API_URL="https://api.scaleway.com/qaas/v1alpha1"  # optional
//! ```

use crate::error::{QaasError, QaasResult};

/// Default QaaS control-plane base URL.
pub const DEFAULT_API_URL: &str = "https://api.scaleway.com/qaas/v1alpha1";

/// Environment variable holding the API secret key.
pub const ENV_SECRET_KEY: &str = "ALSVID_SECRET_KEY";

/// Environment variable holding the project ID.
pub const ENV_PROJECT_ID: &str = "ALSVID_PROJECT_ID";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "ALSVID_API_URL";

/// Connection settings for the QaaS control plane.
#[derive(Clone)]
pub struct QaasConfig {
    /// Project the client is scoped to.
    pub project_id: String,
    /// Secret key sent as `X-Auth-Token` on every request.
    pub secret_key: String,
    /// Control-plane base URL, without trailing slash.
    pub api_url: String,
}

impl std::fmt::Debug for QaasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaasConfig")
            .field("project_id", &self.project_id)
            .field("secret_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl QaasConfig {
    /// Create a configuration with explicit credentials and the default URL.
    pub fn new(
        secret_key: impl Into<String>,
        project_id: impl Into<String>,
    ) -> QaasResult<Self> {
        let secret_key = secret_key.into();
        let project_id = project_id.into();

        if secret_key.is_empty() {
            return Err(QaasError::MissingSecretKey);
        }
        if project_id.is_empty() {
            return Err(QaasError::MissingProjectId);
        }

        Ok(Self {
            project_id,
            secret_key,
            api_url: DEFAULT_API_URL.to_string(),
        })
    }

    /// Read the configuration from `ALSVID_*` environment variables.
    pub fn from_env() -> QaasResult<Self> {
        let secret_key =
            std::env::var(ENV_SECRET_KEY).map_err(|_| QaasError::MissingSecretKey)?;
        let project_id =
            std::env::var(ENV_PROJECT_ID).map_err(|_| QaasError::MissingProjectId)?;

        let mut config = Self::new(secret_key, project_id)?;
        if let Ok(url) = std::env::var(ENV_API_URL) {
            config = config.with_api_url(url);
        }
        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
