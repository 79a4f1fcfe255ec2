//! Client-credentials token endpoint client

use std::time::Duration;

use async_trait::async_trait;
use medref_domain::constants::{GRANT_TYPE_CLIENT_CREDENTIALS, JSON_CONTENT_TYPE};
use medref_domain::{ApiError, ClientCredentials};
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{debug, instrument, warn};

use super::traits::TokenExchange;
use super::types::TokenResponse;

/// Exchanges client credentials for an access token.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    credentials: ClientCredentials,
    user_agent: String,
    timeout: Duration,
}

impl OAuthClient {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        credentials: ClientCredentials,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self { http, credentials, user_agent: user_agent.into(), timeout }
    }

    /// Form fields of the grant request. `scope` is only sent when at least
    /// one scope is configured.
    #[must_use]
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS.to_string()),
            ("client_id", self.credentials.client_id.clone()),
            ("client_secret", self.credentials.client_secret.clone()),
        ];
        if !self.credentials.scopes.is_empty() {
            params.push(("scope", self.credentials.scopes.join(" ")));
        }
        params
    }

    /// POST the grant and parse the token response.
    ///
    /// # Errors
    /// - Authentication error carrying the status and raw body on non-2xx
    /// - Authentication error when a 2xx body is not a token response
    /// - Timeout or network error when the endpoint cannot be reached
    #[instrument(skip(self), fields(token_url = %self.credentials.token_url))]
    pub async fn request_token(&self) -> Result<TokenResponse, ApiError> {
        let response = self
            .http
            .post(&self.credentials.token_url)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .form(&self.form_params())
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "token exchange rejected");
            return Err(ApiError::authentication(format!(
                "token exchange failed with status {}: {}",
                status.as_u16(),
                body
            ))
            .with_status(status.as_u16()));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|err| {
            ApiError::authentication(format!("invalid token response: {err}"))
                .with_status(status.as_u16())
                .with_source(err)
        })?;

        debug!(expires_in = token.expires_in, "token exchange succeeded");
        Ok(token)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::timeout(self.timeout).with_source(err)
        } else {
            ApiError::network(format!("token request failed: {err}")).with_source(err)
        }
    }
}

#[async_trait]
impl TokenExchange for OAuthClient {
    async fn exchange(&self) -> Result<TokenResponse, ApiError> {
        self.request_token().await
    }
}
