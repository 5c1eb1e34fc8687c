use anyhow::{anyhow, Result};
use clap::Args;
use std::env;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(anyhow!(
                "Invalid environment '{s}'. Valid options: development, staging, production"
            )),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Environment {
    /// Backend base URL for an environment when none is configured.
    fn default_base_url(self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:8080",
            Environment::Staging => "https://staging-api.souqly.com",
            Environment::Production => "https://api.souqly.com",
        }
    }
}

/// API connection settings, shared by the bundled binary and anything else
/// embedding the client.
///
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Args, Debug, Default)]
pub struct ApiArgs {
    /// Target environment: development, staging or production
    #[arg(long, env = "SOUQLY_ENV", value_parser = clap::value_parser!(Environment))]
    pub environment: Option<Environment>,

    /// Backend base URL (overrides the environment default)
    #[arg(long, env = "SOUQLY_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// API path prefix appended to the base URL
    #[arg(long, env = "SOUQLY_API_PATH")]
    pub api_path: Option<String>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "SOUQLY_HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Path to the SQLite session store
    #[arg(long, env = "SOUQLY_TOKEN_DB")]
    pub token_db: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub environment: Environment,
    pub base_url: String,
    pub api_path: String,
    pub http_timeout_ms: u64,
    pub token_db: String,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl ApiConfig {
    /// Resolve a full configuration from parsed CLI args.
    /// Priority: CLI args > Environment variables > Defaults
    pub fn resolve(args: ApiArgs) -> Result<Self> {
        let environment = args.environment.unwrap_or_else(|| {
            env::var("SOUQLY_ENV")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Environment::Development)
        });

        let base_url = args
            .api_base_url
            .or_else(|| env::var("SOUQLY_API_BASE_URL").ok())
            .unwrap_or_else(|| environment.default_base_url().to_string());
        validate_url(&base_url, "SOUQLY_API_BASE_URL")?;

        let api_path = args
            .api_path
            .or_else(|| env::var("SOUQLY_API_PATH").ok())
            .unwrap_or_else(|| "/api".to_string());

        let http_timeout_ms = args
            .http_timeout_ms
            .or_else(|| {
                env::var("SOUQLY_HTTP_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(30_000);
        let http_timeout_ms =
            validate_in_range(http_timeout_ms, 1_000, 60_000, "SOUQLY_HTTP_TIMEOUT_MS")?;

        let token_db = args
            .token_db
            .or_else(|| env::var("SOUQLY_TOKEN_DB").ok())
            .unwrap_or_else(|| "./souqly_session.db".to_string());

        Ok(ApiConfig {
            environment,
            base_url,
            api_path,
            http_timeout_ms,
            token_db,
        })
    }

    /// Configuration from environment variables and defaults only, for
    /// embedders that do not parse CLI args.
    pub fn from_env() -> Result<Self> {
        Self::resolve(ApiArgs::default())
    }

    /// Full URL for an API endpoint path, e.g. `/products/42`.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_path, endpoint)
    }

    /// Public URL of a product image.
    pub fn image_url(&self, image_id: i64) -> String {
        self.api_url(&format!("/products/image/{image_id}"))
    }

    #[allow(dead_code)]
    pub fn print_summary(&self) {
        eprintln!("Souqly client configuration:");
        eprintln!("  Environment: {}", self.environment);
        eprintln!("  Base URL: {}", self.base_url);
        eprintln!("  API path: {}", self.api_path);
        eprintln!("  HTTP timeout: {}ms", self.http_timeout_ms);
        eprintln!("  Session store: {}", self.token_db);
    }
}
