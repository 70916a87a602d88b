//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a backend on localhost.
//!
//! - `GOSHEN_BACKEND_URL` - Backend REST API base URL (default: `http://localhost:4000`)
//! - `GOSHEN_DATA_DIR` - Directory for durable client state (default: `.goshen`)
//! - `GOSHEN_CURRENCY` - ISO 4217 display currency (default: `USD`)
//! - `GOSHEN_DELIVERY_FEE` - Flat delivery fee added at checkout (default: `20.00`)
//! - `GOSHEN_CATALOG_TTL_SECS` - Product list cache lifetime (default: 300)
//! - `GOSHEN_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `GOSHEN_GUEST_CART_ON_LOGIN` - `discard` or `merge` (default: `discard`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use goshen_core::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What happens to a guest cart when the shopper signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuestCartPolicy {
    /// The server cart replaces the guest cart.
    #[default]
    Discard,
    /// Guest lines are added to the server cart before it is fetched.
    Merge,
}

impl FromStr for GuestCartPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "merge" => Ok(Self::Merge),
            other => Err(format!("expected `discard` or `merge`, got `{other}`")),
        }
    }
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend REST API base URL
    pub backend_url: Url,
    /// Directory holding the durable guest cart and auth token
    pub data_dir: PathBuf,
    /// Display currency
    pub currency: CurrencyCode,
    /// Flat delivery fee charged on non-empty orders
    pub delivery_fee: Decimal,
    /// How long the product list is cached
    pub catalog_ttl: Duration,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Guest cart handling on login
    pub guest_cart_policy: GuestCartPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            data_dir: PathBuf::from(".goshen"),
            currency: CurrencyCode::USD,
            delivery_fee: Decimal::new(2000, 2),
            catalog_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(30),
            guest_cart_policy: GuestCartPolicy::Discard,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url = parse_env("GOSHEN_BACKEND_URL", DEFAULT_BACKEND_URL, |raw| {
            Url::parse(raw).map_err(|e| e.to_string())
        })?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "GOSHEN_BACKEND_URL".to_string(),
                format!("unsupported scheme `{}`", backend_url.scheme()),
            ));
        }

        let data_dir = PathBuf::from(get_env_or_default("GOSHEN_DATA_DIR", ".goshen"));
        let currency = parse_env("GOSHEN_CURRENCY", "USD", CurrencyCode::from_str)?;
        let delivery_fee = parse_env("GOSHEN_DELIVERY_FEE", "20.00", |raw| {
            let fee = Decimal::from_str(raw).map_err(|e| e.to_string())?;
            if fee.is_sign_negative() {
                return Err("delivery fee cannot be negative".to_string());
            }
            Ok(fee)
        })?;
        let catalog_ttl = parse_env("GOSHEN_CATALOG_TTL_SECS", "300", parse_secs)?;
        let http_timeout = parse_env("GOSHEN_HTTP_TIMEOUT_SECS", "30", parse_secs)?;
        let guest_cart_policy =
            parse_env("GOSHEN_GUEST_CART_ON_LOGIN", "discard", GuestCartPolicy::from_str)?;

        Ok(Self {
            backend_url,
            data_dir,
            currency,
            delivery_fee,
            catalog_ttl,
            http_timeout,
            guest_cart_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Resolve an API path (e.g. `/api/cart/add`) against the backend URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is not valid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.backend_url.join(path)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Read a variable (or its default) and parse it, tagging errors with the key.
fn parse_env<T>(
    key: &str,
    default: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    let raw = get_env_or_default(key, default);
    parse(raw.trim()).map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason))
}

fn parse_secs(raw: &str) -> Result<Duration, String> {
    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| e.to_string())
}
