//! Token manager with single-flight refresh
//!
//! Caches one bearer token and its safety-margined expiry. When the cached
//! token is absent or stale, the first caller starts an exchange and parks a
//! shared future in the state cell; later callers clone that future instead
//! of starting another exchange. The exchange itself clears the marker and
//! stores the token before any waiter is woken.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use medref_domain::constants::TOKEN_SAFETY_MARGIN;
use medref_domain::{ApiError, ClientCredentials};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::client::OAuthClient;
use super::traits::{TokenExchange, TokenSource};
use super::types::TokenResponse;
use crate::time::{Clock, SystemClock};

/// Longest lifetime we will trust from a token response.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

type PendingToken = Shared<BoxFuture<'static, Result<String, ApiError>>>;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Default)]
struct TokenState {
    cached: Option<CachedToken>,
    in_flight: Option<PendingToken>,
}

impl TokenState {
    fn valid_token(&self, now: Instant) -> Option<String> {
        self.cached
            .as_ref()
            .filter(|token| now < token.expires_at)
            .map(|token| token.access_token.clone())
    }
}

struct Inner {
    exchange: Arc<dyn TokenExchange>,
    clock: Arc<dyn Clock>,
    state: Mutex<TokenState>,
}

impl Inner {
    /// Record the outcome of an exchange. Runs exactly once per exchange,
    /// before any waiter observes the result.
    fn settle(&self, outcome: Result<TokenResponse, ApiError>) -> Result<String, ApiError> {
        let mut state = self.state.lock();
        state.in_flight = None;

        let response = outcome?;
        let lifetime = Duration::from_secs(response.expires_in)
            .min(MAX_TOKEN_LIFETIME)
            .saturating_sub(TOKEN_SAFETY_MARGIN);
        state.cached = Some(CachedToken {
            access_token: response.access_token.clone(),
            expires_at: self.clock.now() + lifetime,
        });
        Ok(response.access_token)
    }
}

/// Caching, coalescing source of OAuth2 bearer tokens.
///
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct TokenManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager").finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a token manager around a token endpoint client.
    #[must_use]
    pub fn new(exchange: Arc<dyn TokenExchange>) -> Self {
        Self::with_clock(exchange, Arc::new(SystemClock))
    }

    /// Create a token manager with an explicit clock.
    #[must_use]
    pub fn with_clock(exchange: Arc<dyn TokenExchange>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner { exchange, clock, state: Mutex::new(TokenState::default()) }),
        }
    }

    /// Convenience constructor wiring an [`OAuthClient`] for `credentials`.
    #[must_use]
    pub fn from_credentials(
        http: reqwest::Client,
        credentials: ClientCredentials,
        user_agent: impl Into<String>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let client = OAuthClient::new(http, credentials, user_agent, timeout);
        Self::with_clock(Arc::new(client), clock)
    }

    /// Return a valid access token, exchanging credentials if needed.
    ///
    /// Never returns a token past its safety-margined expiry. Concurrent
    /// callers share a single exchange.
    ///
    /// # Errors
    /// Returns the exchange's error (authentication, network or timeout).
    /// Every caller waiting on the same exchange receives the same error.
    pub async fn get_token(&self) -> Result<String, ApiError> {
        let pending = {
            let mut state = self.inner.state.lock();
            if let Some(token) = state.valid_token(self.inner.clock.now()) {
                return Ok(token);
            }
            match &state.in_flight {
                Some(pending) => {
                    debug!("joining in-flight token exchange");
                    pending.clone()
                }
                None => {
                    debug!("starting token exchange");
                    let pending = Self::exchange(Arc::clone(&self.inner)).boxed().shared();
                    state.in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Forget the cached token. The next [`TokenManager::get_token`] call
    /// performs a fresh exchange (or joins one already running).
    pub fn invalidate(&self) {
        let mut state = self.inner.state.lock();
        if state.cached.take().is_some() {
            debug!("cached access token invalidated");
        }
    }

    /// Whether a token could be served right now without a network call.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.inner.state.lock().valid_token(self.inner.clock.now()).is_some()
    }

    async fn exchange(inner: Arc<Inner>) -> Result<String, ApiError> {
        let outcome = inner.exchange.exchange().await;
        match &outcome {
            Ok(response) => info!(expires_in = response.expires_in, "access token refreshed"),
            Err(err) => warn!(error = %err, kind = err.label(), "access token refresh failed"),
        }
        inner.settle(outcome)
    }
}

#[async_trait]
impl TokenSource for TokenManager {
    async fn token(&self) -> Result<String, ApiError> {
        self.get_token().await
    }

    fn invalidate(&self) {
        TokenManager::invalidate(self);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use medref_domain::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::testing::MockClock;

    fn credentials(server: &MockServer) -> ClientCredentials {
        ClientCredentials {
            client_id: "client".into(),
            client_secret: "secret".into(),
            token_url: format!("{}/oauth2/token", server.uri()),
            scopes: vec![],
        }
    }

    fn manager(server: &MockServer, clock: &MockClock) -> TokenManager {
        TokenManager::from_credentials(
            reqwest::Client::new(),
            credentials(server),
            "medref-rust/test",
            Duration::from_secs(5),
            Arc::new(clock.clone()),
        )
    }

    fn token_body(token: &str, expires_in: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": expires_in
        }))
    }

    /// Exchange double whose responses are numbered by call.
    struct CountingExchange {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TokenExchange for CountingExchange {
        async fn exchange(&self) -> Result<TokenResponse, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::task::yield_now().await;
            if self.fail {
                return Err(ApiError::authentication("denied").with_status(401));
            }
            Ok(TokenResponse {
                access_token: format!("token-{call}"),
                token_type: Some("Bearer".into()),
                expires_in: 3600,
                scope: None,
            })
        }
    }

    /// Validates the cached token is served without another exchange.
    ///
    /// Assertions:
    /// - Two sequential calls return the same token.
    /// - The token endpoint is hit exactly once.
    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(token_body("tok-a", 3600))
            .expect(1)
            .mount(&server)
            .await;

        let clock = MockClock::new();
        let manager = manager(&server, &clock);

        assert_eq!(manager.get_token().await.unwrap(), "tok-a");
        clock.advance(Duration::from_secs(3000));
        assert_eq!(manager.get_token().await.unwrap(), "tok-a");
        assert!(manager.has_valid_token());
    }

    /// Validates the 60 second safety margin triggers exactly one refresh.
    ///
    /// Assertions:
    /// - A call after `expires_in - 60` seconds performs a new exchange.
    /// - The refreshed token is returned.
    #[tokio::test]
    async fn test_expired_token_triggers_single_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(token_body("tok-first", 120))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(token_body("tok-second", 120))
            .expect(1)
            .mount(&server)
            .await;

        let clock = MockClock::new();
        let manager = manager(&server, &clock);

        assert_eq!(manager.get_token().await.unwrap(), "tok-first");
        clock.advance(Duration::from_secs(59));
        assert!(manager.has_valid_token());
        clock.advance(Duration::from_secs(1));
        assert!(!manager.has_valid_token());

        assert_eq!(manager.get_token().await.unwrap(), "tok-second");
        assert_eq!(manager.get_token().await.unwrap(), "tok-second");
    }

    /// Validates invalidate forces a fresh exchange.
    ///
    /// Assertions:
    /// - Token endpoint receives two requests.
    /// - The second call observes the new token.
    #[tokio::test]
    async fn test_invalidate_forces_exchange() {
        let exchange = Arc::new(CountingExchange { calls: AtomicUsize::new(0), fail: false });
        let manager = TokenManager::with_clock(exchange.clone(), Arc::new(MockClock::new()));

        assert_eq!(manager.get_token().await.unwrap(), "token-1");
        manager.invalidate();
        assert!(!manager.has_valid_token());
        assert_eq!(manager.get_token().await.unwrap(), "token-2");
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 2);
    }

    /// Validates concurrent callers coalesce onto one exchange.
    ///
    /// Assertions:
    /// - Ten concurrent calls produce one exchange.
    /// - Every caller receives the identical token.
    #[tokio::test]
    async fn test_concurrent_callers_share_one_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(token_body("tok-shared", 3600).set_delay(Duration::from_millis(100)))
            .expect(1)
            .mount(&server)
            .await;

        let clock = MockClock::new();
        let manager = manager(&server, &clock);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "tok-shared");
        }
    }

    /// Validates a failed exchange is shared and then cleared.
    ///
    /// Assertions:
    /// - All concurrent waiters receive the same authentication error.
    /// - A later call starts a new exchange instead of replaying the failure.
    #[tokio::test]
    async fn test_failure_is_shared_and_not_cached() {
        let exchange = Arc::new(CountingExchange { calls: AtomicUsize::new(0), fail: true });
        let manager = TokenManager::with_clock(exchange.clone(), Arc::new(MockClock::new()));

        let (first, second) = tokio::join!(manager.get_token(), manager.get_token());
        assert_eq!(first.unwrap_err().kind(), &ErrorKind::Authentication);
        assert_eq!(second.unwrap_err().status(), Some(401));
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 1);

        assert!(manager.get_token().await.is_err());
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 2);
    }

    /// Validates tokens shorter-lived than the margin are never served stale.
    ///
    /// Assertions:
    /// - Each call performs its own exchange.
    #[tokio::test]
    async fn test_short_lived_tokens_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(token_body("tok-brief", 30))
            .expect(2)
            .mount(&server)
            .await;

        let clock = MockClock::new();
        let manager = manager(&server, &clock);

        manager.get_token().await.unwrap();
        manager.get_token().await.unwrap();
    }
}
