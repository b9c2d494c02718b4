//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Nothing is strictly required: without hosted-store credentials the
//! dashboard still serves the file-backed screens and every hosted call
//! answers "Supabase not configured".
//!
//! ## Server
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `FRONTEND_ROOT` - Storefront project checkout holding `app/data` and
//!   `public/images` (default: ../marom-frontend)
//! - `STOREFRONT_URL` - Public storefront URL used for preview links
//!   (default: <http://localhost:3000>)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//!
//! ## Hosted store (Supabase)
//! - `SUPABASE_URL` or `NEXT_PUBLIC_SUPABASE_URL` - Project URL
//! - `SUPABASE_ANON_KEY` or `NEXT_PUBLIC_SUPABASE_ANON_KEY` - API key
//! - `SUPABASE_TIMEOUT_SECS` - Per-request timeout (default: 30)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0 to 1.0 (default 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_FRONTEND_ROOT: &str = "../marom-frontend";
const DEFAULT_STOREFRONT_URL: &str = "http://localhost:3000";
const DEFAULT_SUPABASE_TIMEOUT_SECS: u64 = 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Storefront project root (data files and product images live under it)
    pub frontend_root: PathBuf,
    /// Public storefront URL, used for "view on site" links
    pub storefront_url: String,
    /// Hosted store connection (absent or malformed credentials disable it)
    pub supabase: Option<SupabaseConfig>,
    /// Timeout applied to every hosted-store request
    pub supabase_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Supabase project credentials.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://abcd.supabase.co`)
    pub url: Url,
    /// Anonymous (public) API key
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl SupabaseConfig {
    /// Build credentials from raw values.
    ///
    /// Returns `None` when either value is missing or the URL is not an
    /// `http`/`https` URL; the caller falls back to the null store.
    #[must_use]
    pub fn from_parts(url: Option<&str>, anon_key: Option<&str>) -> Option<Self> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        let anon_key = anon_key.map(str::trim).filter(|k| !k.is_empty())?;

        let url = Url::parse(url).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        Some(Self {
            url,
            anon_key: SecretString::from(anon_key.to_owned()),
        })
    }

    fn from_env() -> Option<Self> {
        let url = get_optional_env_any(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]);
        let key = get_optional_env_any(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]);

        let config = Self::from_parts(url.as_deref(), key.as_deref());
        match (&config, url, key) {
            (Some(_), _, Some(key)) => {
                if let Err(e) = validate_secret_strength(&key, "SUPABASE_ANON_KEY") {
                    tracing::warn!("SUPABASE_ANON_KEY validation warning: {e}");
                }
            }
            (None, None, None) => {
                tracing::warn!("Supabase credentials not set; hosted features disabled");
            }
            (None, _, _) => {
                tracing::warn!(
                    "Supabase URL or key missing or malformed; hosted features disabled"
                );
            }
            (Some(_), _, None) => {}
        }
        config
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let frontend_root = PathBuf::from(get_env_or_default("FRONTEND_ROOT", DEFAULT_FRONTEND_ROOT));
        let storefront_url = get_env_or_default("STOREFRONT_URL", DEFAULT_STOREFRONT_URL)
            .trim_end_matches('/')
            .to_string();
        let supabase_timeout = get_env_or_default(
            "SUPABASE_TIMEOUT_SECS",
            &DEFAULT_SUPABASE_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SUPABASE_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let supabase = SupabaseConfig::from_env();
        let log_format = LogFormat::parse(get_optional_env("LOG_FORMAT").as_deref());
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            frontend_root,
            storefront_url,
            supabase,
            supabase_timeout,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for tests and tools: local defaults, no hosted store,
    /// content rooted at `frontend_root`.
    #[must_use]
    pub fn local(frontend_root: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            frontend_root: frontend_root.into(),
            storefront_url: DEFAULT_STOREFRONT_URL.to_string(),
            supabase: None,
            supabase_timeout: Duration::from_secs(DEFAULT_SUPABASE_TIMEOUT_SECS),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns a reference to the Supabase configuration (if configured).
    #[must_use]
    pub const fn supabase(&self) -> Option<&SupabaseConfig> {
        self.supabase.as_ref()
    }

    /// Directory holding the storefront's generated data files.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.frontend_root.join("app").join("data")
    }

    /// Directory holding the storefront's product images.
    #[must_use]
    pub fn product_images_dir(&self) -> PathBuf {
        self.frontend_root
            .join("public")
            .join("images")
            .join("products")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get the first set variable out of a list of aliases.
fn get_optional_env_any(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| get_optional_env(key))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
