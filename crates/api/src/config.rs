use formgen_ai::OpenAiConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// Public base URL used when building upload and download links
    /// (default: `http://localhost:3000`).
    pub public_base_url: String,
    /// Root directory for blob storage (default: `./data`).
    pub storage_dir: String,
    /// OpenAI client configuration for field extraction.
    pub openai: OpenAiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`    |
    /// | `STORAGE_DIR`          | `./data`                   |
    /// | `OPENAI_API_KEY`       | (required)                 |
    /// | `OPENAI_MODEL`         | `gpt-4o-mini`              |
    /// | `OPENAI_API_BASE`      | (unset)                    |
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

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let storage_dir = std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./data".into());

        let openai = OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set"),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            api_base: std::env::var("OPENAI_API_BASE").ok(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            storage_dir,
            openai,
        }
    }

    /// Absolute upload URL for a freshly issued upload token.
    pub fn upload_url(&self, token: &str) -> String {
        format!("{}/api/v1/uploads/{token}", self.public_base_url)
    }

    /// Absolute download URL for a generated artifact.
    pub fn artifact_url(&self, artifact_public_id: &str) -> String {
        format!(
            "{}/api/v1/artifacts/{artifact_public_id}/download",
            self.public_base_url
        )
    }
}
