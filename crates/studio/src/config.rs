//! Studio configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_DATA_DIR` - Directory for file snapshots (default: .storeloom)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string; selects the
//!   Postgres snapshot backend when the `postgres` feature is enabled
//! - `CATALOG_API_BASE` - Payment catalog API base URL (default: <https://api.stripe.com/v1>)
//! - `GEMINI_API_KEY` - Generative Language API key; AI features are disabled without it
//! - `GEMINI_MODEL` - Model name (default: gemini-2.5-pro)
//! - `NOTIFICATION_TTL_MS` - Notification lifetime in milliseconds (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".storeloom";
const DEFAULT_CATALOG_API_BASE: &str = "https://api.stripe.com/v1";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Directory for the file snapshot backend
    pub data_dir: PathBuf,
    /// `PostgreSQL` URL for the database snapshot backend (contains password)
    pub database_url: Option<SecretString>,
    /// Payment catalog API configuration
    pub catalog: CatalogConfig,
    /// Content generation API configuration, if a key is present
    pub gemini: Option<GeminiConfig>,
    /// How long a notification stays visible
    pub notification_ttl: Duration,
    /// Error tracking configuration
    pub sentry: SentryConfig,
}

/// Payment catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// REST API base URL, without trailing slash
    pub api_base: String,
}

/// Generative Language API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: SecretString,
    /// Model used for every request
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Sentry configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN
    pub dsn: Option<String>,
    /// Environment tag (e.g. "production")
    pub environment: Option<String>,
    /// Fraction of errors sent
    pub sample_rate: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_url: None,
            catalog: CatalogConfig::default(),
            gemini: None,
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            sentry: SentryConfig {
                sample_rate: 1.0,
                ..SentryConfig::default()
            },
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_CATALOG_API_BASE.to_string(),
        }
    }
}

impl StudioConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed,
    /// or if the AI key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let database_url = get_optional_env("STOREFRONT_DATABASE_URL").map(SecretString::from);
        let catalog = CatalogConfig::from_env()?;
        let gemini = GeminiConfig::from_env()?;
        let notification_ttl = Duration::from_millis(parse_env(
            "NOTIFICATION_TTL_MS",
            DEFAULT_NOTIFICATION_TTL_MS,
        )?);
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            data_dir,
            database_url,
            catalog,
            gemini,
            notification_ttl,
            sentry,
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("CATALOG_API_BASE", DEFAULT_CATALOG_API_BASE);
        let api_base = raw.trim_end_matches('/').to_string();
        Url::parse(&api_base).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_API_BASE".to_string(), e.to_string())
        })?;
        Ok(Self { api_base })
    }
}

impl GeminiConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(key) = get_optional_env("GEMINI_API_KEY").filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        let api_key = SecretString::from(key);
        validate_not_placeholder(&api_key, "GEMINI_API_KEY")?;

        Ok(Some(Self {
            api_key,
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        }))
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", 1.0)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Reject secrets that are obviously template values.
fn validate_not_placeholder(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.expose_secret().to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".storeloom"));
        assert_eq!(config.notification_ttl, Duration::from_millis(3000));
        assert_eq!(config.catalog.api_base, "https://api.stripe.com/v1");
        assert!(config.gemini.is_none());
    }

    #[test]
    fn test_parse_value_invalid_number() {
        let err = parse_value::<u64>("NOTIFICATION_TTL_MS", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "NOTIFICATION_TTL_MS"));
    }

    #[test]
    fn test_parse_value_trims() {
        let ttl: u64 = parse_value("NOTIFICATION_TTL_MS", " 1500 ").unwrap();
        assert_eq!(ttl, 1500);
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let secret = SecretString::from("your-gemini-key");
        let result = validate_not_placeholder(&secret, "GEMINI_API_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_real_looking_key_accepted() {
        let secret = SecretString::from("AIzaSyD3k9Lm2Qp7Vx4Rt8Wz1Bn6");
        assert!(validate_not_placeholder(&secret, "GEMINI_API_KEY").is_ok());
    }

    #[test]
    fn test_gemini_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: SecretString::from("AIzaSyD3k9Lm2Qp7Vx4Rt8Wz1Bn6"),
            model: "gemini-2.5-pro".to_string(),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("AIza"));
    }
}
