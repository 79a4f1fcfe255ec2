//! Client configuration
//!
//! [`ClientOptions`] is the loose, user-facing input: every field is optional
//! and it deserializes straight from TOML/JSON config files. [`ClientOptions::resolve`]
//! validates it into an immutable [`ClientConfig`] with defaults filled in.
//! A client holds exactly one [`Credentials`] variant for its lifetime.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::constants::{
    CLIENT_VERSION, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_QUOTA_FIELD,
    DEFAULT_QUOTA_VALUE, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS, DEFAULT_TOKEN_URL,
    USER_AGENT_PRODUCT,
};
use crate::errors::ConfigError;

/// OAuth2 client-credentials grant parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub scopes: Vec<String>,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// The single authentication mode of a client.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Static key sent in the `x-api-key` header
    ApiKey(String),
    /// Bearer tokens obtained through the client-credentials grant
    ClientCredentials(ClientCredentials),
}

impl Credentials {
    /// Short label for logs.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::ClientCredentials(_) => "oauth2",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Self::ClientCredentials(credentials) => {
                f.debug_tuple("ClientCredentials").field(credentials).finish()
            }
        }
    }
}

/// Decides whether a 429 body means "quota exhausted" rather than "slow down".
///
/// The field is looked up in the error object (`{"error": {...}}` or the top
/// level body) and compared case-insensitively against `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDiscriminator {
    pub field: String,
    pub values: Vec<String>,
}

impl Default for QuotaDiscriminator {
    fn default() -> Self {
        Self { field: DEFAULT_QUOTA_FIELD.to_string(), values: vec![DEFAULT_QUOTA_VALUE.to_string()] }
    }
}

impl QuotaDiscriminator {
    /// Check an error object for the quota marker.
    #[must_use]
    pub fn matches(&self, error_object: &Value) -> bool {
        let candidate = match error_object.get(&self.field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Bool(flag)) => flag.to_string(),
            Some(Value::Number(number)) => number.to_string(),
            _ => return false,
        };
        self.values.iter().any(|value| value.eq_ignore_ascii_case(&candidate))
    }
}

/// User-supplied client options.
///
/// Supply either `api_key` or `client_id` + `client_secret`. Empty strings
/// count as absent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub user_agent_suffix: Option<String>,
    pub retry_on_timeout: Option<bool>,
    pub quota_discriminator: Option<QuotaDiscriminator>,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("ClientOptions")
            .field("api_key", &redact(&self.api_key))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("user_agent_suffix", &self.user_agent_suffix)
            .field("retry_on_timeout", &self.retry_on_timeout)
            .field("quota_discriminator", &self.quota_discriminator)
            .finish()
    }
}

impl ClientOptions {
    /// Options authenticating with a static API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), ..Self::default() }
    }

    /// Options authenticating through the OAuth2 client-credentials grant.
    pub fn with_client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn retry_on_timeout(mut self, enabled: bool) -> Self {
        self.retry_on_timeout = Some(enabled);
        self
    }

    #[must_use]
    pub fn quota_discriminator(mut self, discriminator: QuotaDiscriminator) -> Self {
        self.quota_discriminator = Some(discriminator);
        self
    }

    /// Fill unset fields from `fallback`. Values already present win.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            api_key: self.api_key.or(fallback.api_key),
            client_id: self.client_id.or(fallback.client_id),
            client_secret: self.client_secret.or(fallback.client_secret),
            token_url: self.token_url.or(fallback.token_url),
            scopes: self.scopes.or(fallback.scopes),
            base_url: self.base_url.or(fallback.base_url),
            timeout_ms: self.timeout_ms.or(fallback.timeout_ms),
            max_retries: self.max_retries.or(fallback.max_retries),
            retry_delay_ms: self.retry_delay_ms.or(fallback.retry_delay_ms),
            user_agent_suffix: self.user_agent_suffix.or(fallback.user_agent_suffix),
            retry_on_timeout: self.retry_on_timeout.or(fallback.retry_on_timeout),
            quota_discriminator: self.quota_discriminator.or(fallback.quota_discriminator),
        }
    }

    /// Validate the options and fill in defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when no credential form is complete, both forms
    /// are present, a URL is not absolute http(s), or the timeout is zero.
    pub fn resolve(self) -> Result<ClientConfig, ConfigError> {
        let credentials = resolve_credentials(
            non_empty(self.api_key),
            non_empty(self.client_id),
            non_empty(self.client_secret),
            non_empty(self.token_url),
            self.scopes.unwrap_or_default(),
        )?;

        let base_url = non_empty(self.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_url("base_url", &base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        let mut user_agent = format!("{USER_AGENT_PRODUCT}/{CLIENT_VERSION}");
        if let Some(suffix) = non_empty(self.user_agent_suffix) {
            user_agent.push(' ');
            user_agent.push_str(suffix.trim());
        }

        Ok(ClientConfig {
            credentials,
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_delay: Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)),
            user_agent,
            retry_on_timeout: self.retry_on_timeout.unwrap_or(false),
            quota_discriminator: self.quota_discriminator.unwrap_or_default(),
        })
    }
}

/// Validated, immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub credentials: Credentials,
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Ordinary retries after the first attempt
    pub max_retries: u32,
    /// Base of the exponential backoff schedule
    pub retry_delay: Duration,
    pub user_agent: String,
    pub retry_on_timeout: bool,
    pub quota_discriminator: QuotaDiscriminator,
}

fn resolve_credentials(
    api_key: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: Option<String>,
    scopes: Vec<String>,
) -> Result<Credentials, ConfigError> {
    match (api_key, client_id, client_secret) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ConfigError::ConflictingCredentials),
        (Some(api_key), None, None) => Ok(Credentials::ApiKey(api_key)),
        (None, Some(client_id), Some(client_secret)) => {
            let token_url = token_url.unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string());
            validate_url("token_url", &token_url)?;
            let scopes = scopes
                .into_iter()
                .map(|scope| scope.trim().to_string())
                .filter(|scope| !scope.is_empty())
                .collect();
            Ok(Credentials::ClientCredentials(ClientCredentials {
                client_id,
                client_secret,
                token_url,
                scopes,
            }))
        }
        (None, Some(_), None) => {
            Err(ConfigError::IncompleteClientCredentials { missing: "client_secret" })
        }
        (None, None, Some(_)) => Err(ConfigError::IncompleteClientCredentials { missing: "client_id" }),
        (None, None, None) => Err(ConfigError::MissingCredentials),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_url(field: &'static str, raw: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidValue { field, reason: format!("{raw}: {e}") })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}
