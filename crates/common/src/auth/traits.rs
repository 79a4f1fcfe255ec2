//! Seams between the executor, the token cache and the token endpoint

use async_trait::async_trait;
use medref_domain::ApiError;

use super::types::TokenResponse;

/// Performs one token exchange against the authorization server.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// # Errors
    /// Returns an authentication error for any non-2xx answer, or a
    /// network/timeout error when the endpoint cannot be reached.
    async fn exchange(&self) -> Result<TokenResponse, ApiError>;
}

/// Supplies bearer tokens to the request executor.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// A token that is valid right now.
    ///
    /// # Errors
    /// Propagates the failure of the exchange that was needed to get one.
    async fn token(&self) -> Result<String, ApiError>;

    /// Drop any cached token so the next [`TokenSource::token`] call fetches
    /// a fresh one.
    fn invalidate(&self);
}
