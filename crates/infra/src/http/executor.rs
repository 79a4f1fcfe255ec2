//! Request executor
//!
//! Performs one logical API call: attaches exactly one auth header, bounds
//! every attempt by the configured timeout, applies the retry policy and maps
//! the final failure onto [`ApiError`].
//!
//! Retry policy per logical call:
//! - 401 under OAuth: invalidate the token and retry once. This retry does
//!   not consume the ordinary budget.
//! - 429 with an integer `retry-after`: wait that many seconds, counts as a
//!   retry.
//! - 5xx and transport failures: wait `retry_delay * 2^attempt`, counts as a
//!   retry.
//! - Timeouts: terminal unless `retry_on_timeout` is enabled, in which case
//!   they are treated like transport failures.
//! - Token acquisition that never reached the token endpoint follows the
//!   transport and timeout rules above. A rejected exchange is terminal.
//! - Everything else: terminal.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use medref_common::auth::{TokenManager, TokenSource};
use medref_common::resilience::{Backoff, Sleeper, TokioSleeper};
use medref_common::time::{Clock, SystemClock};
use medref_domain::constants::{API_KEY_HEADER, JSON_CONTENT_TYPE};
use medref_domain::{
    ApiError, ClientConfig, ConfigError, Credentials, ErrorKind, LookupOptions, QuotaDiscriminator,
    SearchParams,
};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::errors::{map_error_response, parse_retry_after};
use super::query::{lookup_query, search_query};

/// How requests are authenticated. Exactly one header is attached per
/// attempt.
#[derive(Clone)]
pub enum AuthMode {
    /// `x-api-key: <key>`
    ApiKey(String),
    /// `Authorization: Bearer <token>` from a token source
    Bearer(Arc<dyn TokenSource>),
}

impl AuthMode {
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::Bearer(_) => "oauth2",
        }
    }
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"<token source>").finish(),
        }
    }
}

/// Buffered response of a single attempt.
#[derive(Debug)]
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// Why a single attempt produced no response.
#[derive(Debug)]
enum AttemptFailure {
    /// The token endpoint answered with a rejection. Terminal.
    Auth(ApiError),
    /// The token endpoint could not be reached. Network or timeout kind.
    TokenTransport(ApiError),
    /// No response within the per-attempt timeout.
    Timeout(Option<reqwest::Error>),
    /// Connection, DNS, TLS or body read failure.
    Transport(reqwest::Error),
}

/// Mutable state of one logical call.
#[derive(Debug, Default)]
struct RequestAttempt {
    /// Ordinary retries consumed so far
    attempt: u32,
    /// Whether the single 401-triggered reauthentication has been used
    reauthenticated: bool,
}

/// Authenticated HTTP executor with retry, backoff and error mapping.
#[derive(Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: String,
    auth: AuthMode,
    timeout: Duration,
    max_retries: u32,
    backoff: Backoff,
    user_agent: String,
    retry_on_timeout: bool,
    quota: QuotaDiscriminator,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("user_agent", &self.user_agent)
            .field("retry_on_timeout", &self.retry_on_timeout)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Start building an executor from validated configuration.
    #[must_use]
    pub fn builder(config: ClientConfig) -> ExecutorBuilder {
        ExecutorBuilder::new(config)
    }

    /// Build an executor with the default HTTP client, clock and sleeper.
    ///
    /// # Errors
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthMode {
        &self.auth
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// GET `path` with lookup options as the query string.
    ///
    /// # Errors
    /// Returns the mapped [`ApiError`] once the retry policy is exhausted.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &LookupOptions,
    ) -> Result<T, ApiError> {
        self.execute(Method::GET, path, lookup_query(options), None).await
    }

    /// POST a JSON body to `path` with lookup options as the query string.
    ///
    /// The body is serialized once and replayed verbatim on every attempt.
    ///
    /// # Errors
    /// Returns a validation error if `body` cannot be serialized, otherwise
    /// the mapped [`ApiError`] once the retry policy is exhausted.
    pub async fn post<B, T>(&self, path: &str, body: &B, options: &LookupOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|err| {
            ApiError::validation(format!("failed to serialize request body: {err}"), None)
                .with_source(err)
        })?;
        self.execute(Method::POST, path, lookup_query(options), Some(payload)).await
    }

    /// GET `path` with search parameters as the query string.
    ///
    /// # Errors
    /// Returns the mapped [`ApiError`] once the retry policy is exhausted.
    pub async fn search<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &SearchParams,
    ) -> Result<T, ApiError> {
        self.execute(Method::GET, path, search_query(params), None).await
    }

    #[instrument(skip(self, query, body), fields(auth = self.auth.mode()))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<String>,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let url = match &query {
            Some(query) => format!("{}{path}?{query}", self.base_url),
            None => format!("{}{path}", self.base_url),
        };
        let mut state = RequestAttempt::default();

        loop {
            debug!(attempt = state.attempt, %url, "sending request");

            let response = match self.send_once(&method, &url, body.as_deref()).await {
                Ok(response) => response,
                Err(AttemptFailure::Auth(err)) => return Err(err),
                Err(AttemptFailure::TokenTransport(err)) => {
                    let retryable = match err.kind() {
                        ErrorKind::Timeout { .. } => self.retry_on_timeout,
                        _ => true,
                    };
                    if retryable && state.attempt < self.max_retries {
                        warn!(
                            attempt = state.attempt,
                            error = %err,
                            "token endpoint unreachable, retrying"
                        );
                        self.back_off(&mut state).await;
                        continue;
                    }
                    return Err(err);
                }
                Err(AttemptFailure::Timeout(source)) => {
                    if self.retry_on_timeout && state.attempt < self.max_retries {
                        warn!(attempt = state.attempt, "request timed out, retrying");
                        self.back_off(&mut state).await;
                        continue;
                    }
                    let err = ApiError::timeout(self.timeout);
                    return Err(match source {
                        Some(source) => err.with_source(source),
                        None => err,
                    });
                }
                Err(AttemptFailure::Transport(err)) => {
                    if state.attempt < self.max_retries {
                        warn!(attempt = state.attempt, error = %err, "transport failure, retrying");
                        self.back_off(&mut state).await;
                        continue;
                    }
                    return Err(ApiError::network(format!(
                        "request failed after {} attempt(s): {err}",
                        state.attempt + 1
                    ))
                    .with_source(err));
                }
            };

            let status = response.status;
            debug!(attempt = state.attempt, status = status.as_u16(), "received response");

            if status.is_success() {
                return decode(&response);
            }

            if status == StatusCode::UNAUTHORIZED && !state.reauthenticated {
                if let AuthMode::Bearer(source) = &self.auth {
                    warn!("request unauthorized, refreshing access token");
                    source.invalidate();
                    state.reauthenticated = true;
                    continue;
                }
            }

            if status == StatusCode::TOO_MANY_REQUESTS && state.attempt < self.max_retries {
                if let Some(seconds) = parse_retry_after(&response.headers) {
                    warn!(retry_after = seconds, attempt = state.attempt, "rate limited, waiting");
                    self.sleeper.sleep(Duration::from_secs(seconds)).await;
                    state.attempt += 1;
                    continue;
                }
            }

            if status.is_server_error() && state.attempt < self.max_retries {
                warn!(status = status.as_u16(), attempt = state.attempt, "server error, retrying");
                self.back_off(&mut state).await;
                continue;
            }

            let err = map_error_response(
                status,
                path,
                &response.headers,
                &response.body,
                &self.quota,
            );
            debug!(kind = err.label(), status = status.as_u16(), "request failed");
            return Err(err);
        }
    }

    async fn back_off(&self, state: &mut RequestAttempt) {
        let delay = self.backoff.delay_for(state.attempt);
        debug!(delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "backing off");
        self.sleeper.sleep(delay).await;
        state.attempt += 1;
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<RawResponse, AttemptFailure> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(USER_AGENT, &self.user_agent);

        request = match &self.auth {
            AuthMode::ApiKey(key) => request.header(API_KEY_HEADER, key),
            AuthMode::Bearer(source) => {
                let token = source.token().await.map_err(|err| match err.kind() {
                    ErrorKind::Network | ErrorKind::Timeout { .. } => {
                        AttemptFailure::TokenTransport(err)
                    }
                    _ => AttemptFailure::Auth(err),
                })?;
                request.bearer_auth(token)
            }
        };

        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let attempt = async {
            let response = request.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse { status, headers, body: body.to_vec() })
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) if err.is_timeout() => Err(AttemptFailure::Timeout(Some(err))),
            Ok(Err(err)) => Err(AttemptFailure::Transport(err)),
            Err(_) => Err(AttemptFailure::Timeout(None)),
        }
    }
}

/// Decode a success body. Empty bodies and 204/205 decode from `null`.
fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ApiError> {
    let no_content = matches!(response.status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT)
        || response.body.iter().all(u8::is_ascii_whitespace);

    let decoded = if no_content {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(&response.body)
    };

    decoded.map_err(|err| {
        ApiError::server(format!("failed to decode response body: {err}"))
            .with_status(response.status.as_u16())
            .with_code("invalid_response")
            .with_source(err)
    })
}

/// Builder for [`RequestExecutor`].
///
/// Every override is optional; production code only needs
/// [`ExecutorBuilder::build`].
pub struct ExecutorBuilder {
    config: ClientConfig,
    http: Option<reqwest::Client>,
    sleeper: Option<Arc<dyn Sleeper>>,
    clock: Option<Arc<dyn Clock>>,
    token_source: Option<Arc<dyn TokenSource>>,
}

impl fmt::Debug for ExecutorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorBuilder")
            .field("config", &self.config)
            .field("sleeper", &self.sleeper)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ExecutorBuilder {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config, http: None, sleeper: None, clock: None, token_source: None }
    }

    /// Reuse an existing HTTP client (connection pool, proxies, TLS roots).
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the backoff sleeper.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Clock used for token expiry when a token manager is created.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Supply bearer tokens from `source` instead of a token manager built
    /// from the configured client credentials. Ignored in API-key mode.
    #[must_use]
    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    /// # Errors
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<RequestExecutor, ConfigError> {
        let Self { config, http, sleeper, clock, token_source } = self;

        let http = match http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .build()
                .map_err(|err| ConfigError::HttpClient(err.to_string()))?,
        };

        let auth = match config.credentials {
            Credentials::ApiKey(key) => AuthMode::ApiKey(key),
            Credentials::ClientCredentials(credentials) => {
                let source = token_source.unwrap_or_else(|| {
                    Arc::new(TokenManager::from_credentials(
                        http.clone(),
                        credentials,
                        config.user_agent.clone(),
                        config.timeout,
                        clock.unwrap_or_else(|| Arc::new(SystemClock)),
                    ))
                });
                AuthMode::Bearer(source)
            }
        };

        debug!(base_url = %config.base_url, auth = auth.mode(), "request executor configured");

        Ok(RequestExecutor {
            http,
            base_url: config.base_url,
            auth,
            timeout: config.timeout,
            max_retries: config.max_retries,
            backoff: Backoff::new(config.retry_delay),
            user_agent: config.user_agent,
            retry_on_timeout: config.retry_on_timeout,
            quota: config.quota_discriminator,
            sleeper: sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
        })
    }
}
