use std::time::Duration;

/// Server version tag sent with image requests by default.
pub const DEFAULT_SERVER_VERSION: &str = "v2";

/// Generation service settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL, e.g. `http://localhost:5000`. `None` disables the live strategy.
    pub api_url: Option<String>,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    pub server_version: String,
}

impl GenerationConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var                     | Default  |
    /// |-----------------------------|----------|
    /// | `GENERATION_API_URL`        | (unset)  |
    /// | `GENERATION_TIMEOUT_SECS`   | `300`    |
    /// | `GENERATION_SERVER_VERSION` | `v2`     |
    pub fn from_env() -> Self {
        let api_url = std::env::var("GENERATION_API_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        let server_version = std::env::var("GENERATION_SERVER_VERSION")
            .unwrap_or_else(|_| DEFAULT_SERVER_VERSION.into());

        Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            server_version,
        }
    }
}
