use glossa_pipeline::coordinator::{DEFAULT_MAX_CONCURRENCY, MAX_CONCURRENCY_LIMIT};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Units in flight per bulk run (default: `4`, clamped to `1..=16`).
    pub bulk_max_concurrency: usize,
    /// Base URL of the generation service.
    pub generation_url: String,
    /// Per-request timeout for the generation service in seconds.
    pub generation_timeout_secs: u64,
    /// Idle time after which a wizard session is closed (default: `1800`).
    pub session_idle_ttl_secs: u64,
    /// How often idle sessions are swept (default: `60`).
    pub session_sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `BULK_MAX_CONCURRENCY`        | `4`                     |
    /// | `GENERATION_URL`              | `http://localhost:8090` |
    /// | `GENERATION_TIMEOUT_SECS`     | `60`                    |
    /// | `SESSION_IDLE_TTL_SECS`       | `1800`                  |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `60`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let bulk_max_concurrency: usize = std::env::var("BULK_MAX_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENCY.to_string())
            .parse::<usize>()
            .expect("BULK_MAX_CONCURRENCY must be a valid usize")
            .clamp(1, MAX_CONCURRENCY_LIMIT);

        let generation_url =
            std::env::var("GENERATION_URL").unwrap_or_else(|_| "http://localhost:8090".into());

        let generation_timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        let session_idle_ttl_secs: u64 = std::env::var("SESSION_IDLE_TTL_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("SESSION_IDLE_TTL_SECS must be a valid u64");

        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse::<u64>()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64")
            .max(1);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            bulk_max_concurrency,
            generation_url,
            generation_timeout_secs,
            session_idle_ttl_secs,
            session_sweep_interval_secs,
        }
    }
}
