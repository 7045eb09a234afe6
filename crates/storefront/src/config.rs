//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `EMAIL` - Gmail account that sends and receives order emails
//! - `CLIENT_ID` - Google OAuth client ID
//! - `CLIENT_SECRET` - Google OAuth client secret
//! - `REDIRECT_URI` - OAuth redirect URI registered for the client
//! - `REFRESH_TOKEN` - Long-lived OAuth refresh token for `EMAIL`
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SMTP_HOST` - SMTP relay (default: smtp.gmail.com)
//! - `OAUTH_TOKEN_URL` - Token endpoint (default: <https://oauth2.googleapis.com/token>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use coffey_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Whole values that are placeholders, compared case-insensitively
const PLACEHOLDER_VALUES: &[&str] = &[
    "changeme",
    "change-me",
    "placeholder",
    "replaceme",
    "replace-me",
    "secret",
    "token",
    "todo",
    "fixme",
    "none",
    "null",
];

/// Prefixes that only template values start with (`your-refresh-token`, `<secret>`)
const PLACEHOLDER_PREFIXES: &[&str] = &["your-", "your_", "<", "{{"];

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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Order email delivery
    pub mail: MailConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Gmail OAuth2 mail delivery configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct MailConfig {
    /// Mailbox that both sends and receives order emails
    pub account: Email,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Redirect URI registered with the OAuth client, used when re-authorizing
    pub redirect_uri: Url,
    /// Long-lived refresh token exchanged for an access token on every send
    pub refresh_token: SecretString,
    /// SMTP relay host
    pub smtp_host: String,
    /// OAuth token endpoint
    pub token_url: Url,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("account", &self.account)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("refresh_token", &"[REDACTED]")
            .field("smtp_host", &self.smtp_host)
            .field("token_url", &self.token_url.as_str())
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let mail = MailConfig::from_env()?;

        Ok(Self {
            host,
            port,
            mail,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let account = Email::parse(&get_required_env("EMAIL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("EMAIL".to_string(), e.to_string()))?;

        Ok(Self {
            account,
            client_id: get_required_env("CLIENT_ID")?,
            client_secret: get_validated_secret("CLIENT_SECRET")?,
            redirect_uri: get_url("REDIRECT_URI", None)?,
            refresh_token: get_validated_secret("REFRESH_TOKEN")?,
            smtp_host: get_env_or_default("SMTP_HOST", DEFAULT_SMTP_HOST),
            token_url: get_url("OAUTH_TOKEN_URL", Some(DEFAULT_TOKEN_URL))?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a URL, falling back to `default` when the variable is unset.
fn get_url(key: &str, default: Option<&str>) -> Result<Url, ConfigError> {
    let raw = match (std::env::var(key), default) {
        (Ok(value), _) => value,
        (Err(_), Some(default)) => default.to_string(),
        (Err(_), None) => return Err(ConfigError::MissingEnvVar(key.to_string())),
    };
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a sample rate in `[0.0, 1.0]`.
fn get_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    parse_sample_rate(&raw)
        .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("{raw} is not in 0.0..=1.0")))
}

fn parse_sample_rate(raw: &str) -> Option<f32> {
    raw.parse::<f32>()
        .ok()
        .filter(|rate| (0.0..=1.0).contains(rate))
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
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.trim().to_lowercase();

    let placeholder = PLACEHOLDER_VALUES.contains(&lower.as_str())
        || PLACEHOLDER_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix));
    if placeholder {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "appears to be a placeholder".to_string(),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the value issued by Google."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Exposes a secret for the few call sites that must send it over the wire.
pub(crate) fn expose(secret: &SecretString) -> &str {
    secret.expose_secret()
}
