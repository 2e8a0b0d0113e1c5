//! Client configuration.

use uuid::Uuid;

/// Configuration for connecting to the storefront backend.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend base address, e.g. `"https://shop.example.com"`.
    ///
    /// Paths are appended under `/api/v1`.
    pub base_url: String,

    /// Bearer token for authenticated customers.
    ///
    /// `None` for anonymous sessions; the server then resolves the cart
    /// through the session id instead of the caller's identity.
    pub api_token: Option<String>,

    /// Anonymous cart session identifier, sent as the `session_id` query
    /// parameter on cart lookups.
    pub session_id: String,
}

impl StorefrontConfig {
    /// Build a configuration for an anonymous visit with a fresh session id.
    #[must_use]
    pub fn anonymous(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            session_id: Uuid::now_v7().to_string(),
        }
    }

    /// Build a configuration for an authenticated customer.
    ///
    /// The token is injected here once; services never read credentials
    /// from ambient storage.
    #[must_use]
    pub fn authenticated(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: Some(token.into()),
            session_id: Uuid::now_v7().to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `STOREFRONT_API_URL` (required) and `STOREFRONT_API_TOKEN`
    /// (optional). A `.env` file is honored when present.
    ///
    /// # Errors
    ///
    /// Returns an error when `STOREFRONT_API_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        _ = dotenvy::dotenv();

        let base_url = std::env::var("STOREFRONT_API_URL")
            .map_err(|_err| ConfigError::MissingVar("STOREFRONT_API_URL"))?;

        let api_token = std::env::var("STOREFRONT_API_TOKEN").ok();

        Ok(Self {
            base_url,
            api_token,
            session_id: Uuid::now_v7().to_string(),
        })
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}
