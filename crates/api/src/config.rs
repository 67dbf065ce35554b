use langmap_core::import::DEFAULT_MAX_IMPORT_ROWS;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest batch the import endpoint accepts (default: `5000`).
    pub import_max_rows: usize,
    /// Lifetime of a cached listing view in seconds (default: `300`).
    pub listing_cache_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `IMPORT_MAX_ROWS`        | `5000`                  |
    /// | `LISTING_CACHE_TTL_SECS` | `300`                   |
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

        let import_max_rows: usize = std::env::var("IMPORT_MAX_ROWS")
            .map(|v| v.parse().expect("IMPORT_MAX_ROWS must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_IMPORT_ROWS);

        let listing_cache_ttl_secs: u64 = std::env::var("LISTING_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("LISTING_CACHE_TTL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            import_max_rows,
            listing_cache_ttl_secs,
        }
    }
}
