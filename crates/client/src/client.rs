//! Client facade
//!
//! [`MedrefClient`] validates configuration once, owns the single request
//! executor and hands out typed endpoint views that borrow it.

use std::path::PathBuf;
use std::sync::Arc;

use medref_common::auth::TokenSource;
use medref_common::resilience::Sleeper;
use medref_common::time::Clock;
use medref_domain::{
    ClientConfig, ClientOptions, ConfigError, Cvx, FdaLabel, Icd10, Loinc, Mvx, Ndc, Npi, RxNorm,
    Snomed,
};
use medref_infra::{config, Endpoint, RequestExecutor};
use tracing::info;

/// Typed client for the medref reference-data API.
///
/// Cheap to clone; clones share the executor and, in OAuth mode, the cached
/// access token.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use medref::{ClientOptions, LookupOptions, MedrefClient, Shape};
///
/// let client = MedrefClient::new(ClientOptions::with_api_key("my-key"))?;
/// let ndc = client.ndc().get("0069-0151-01", &LookupOptions::new().shape(Shape::Full)).await?;
/// println!("{:?}", ndc.data.brand_name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MedrefClient {
    executor: Arc<RequestExecutor>,
    config: Arc<ClientConfig>,
}

impl MedrefClient {
    /// Validate `options` and build a client.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when neither or both credential forms are
    /// supplied, a URL is invalid, the timeout is zero, or the HTTP client
    /// cannot be created.
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        Self::builder(options).build()
    }

    /// Build a client from `MEDREF_*` environment variables.
    ///
    /// # Errors
    /// See [`config::load_from_env`] and [`MedrefClient::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(config::load_from_env()?)
    }

    /// Build a client from a TOML or JSON file, probing the standard
    /// locations when `path` is `None`.
    ///
    /// # Errors
    /// See [`config::load_from_file`] and [`MedrefClient::new`].
    pub fn from_file(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::new(config::load_from_file(path)?)
    }

    /// Environment first, then the first config file found.
    ///
    /// # Errors
    /// See [`config::load`] and [`MedrefClient::new`].
    pub fn from_default_sources() -> Result<Self, ConfigError> {
        Self::new(config::load()?)
    }

    /// Builder for injecting a custom HTTP client, sleeper, clock or token
    /// source.
    #[must_use]
    pub fn builder(options: ClientOptions) -> MedrefClientBuilder {
        MedrefClientBuilder {
            options,
            http: None,
            sleeper: None,
            clock: None,
            token_source: None,
        }
    }

    /// National Drug Codes
    #[must_use]
    pub fn ndc(&self) -> Endpoint<'_, Ndc> {
        Endpoint::new(&self.executor)
    }

    /// National Provider Identifiers, including connectivity lookups
    #[must_use]
    pub fn npi(&self) -> Endpoint<'_, Npi> {
        Endpoint::new(&self.executor)
    }

    #[must_use]
    pub fn rxnorm(&self) -> Endpoint<'_, RxNorm> {
        Endpoint::new(&self.executor)
    }

    #[must_use]
    pub fn loinc(&self) -> Endpoint<'_, Loinc> {
        Endpoint::new(&self.executor)
    }

    #[must_use]
    pub fn icd10(&self) -> Endpoint<'_, Icd10> {
        Endpoint::new(&self.executor)
    }

    /// CDC vaccine codes
    #[must_use]
    pub fn cvx(&self) -> Endpoint<'_, Cvx> {
        Endpoint::new(&self.executor)
    }

    /// CDC vaccine manufacturer codes
    #[must_use]
    pub fn mvx(&self) -> Endpoint<'_, Mvx> {
        Endpoint::new(&self.executor)
    }

    /// FDA structured product labels
    #[must_use]
    pub fn fda_labels(&self) -> Endpoint<'_, FdaLabel> {
        Endpoint::new(&self.executor)
    }

    #[must_use]
    pub fn snomed(&self) -> Endpoint<'_, Snomed> {
        Endpoint::new(&self.executor)
    }

    /// The shared executor, for calls without a typed wrapper.
    #[must_use]
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// The validated configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Builder returned by [`MedrefClient::builder`].
pub struct MedrefClientBuilder {
    options: ClientOptions,
    http: Option<reqwest::Client>,
    sleeper: Option<Arc<dyn Sleeper>>,
    clock: Option<Arc<dyn Clock>>,
    token_source: Option<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for MedrefClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedrefClientBuilder").field("options", &self.options).finish_non_exhaustive()
    }
}

impl MedrefClientBuilder {
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    /// # Errors
    /// See [`MedrefClient::new`].
    pub fn build(self) -> Result<MedrefClient, ConfigError> {
        let config = self.options.resolve()?;

        let mut builder = RequestExecutor::builder(config.clone());
        if let Some(http) = self.http {
            builder = builder.http_client(http);
        }
        if let Some(sleeper) = self.sleeper {
            builder = builder.sleeper(sleeper);
        }
        if let Some(clock) = self.clock {
            builder = builder.clock(clock);
        }
        if let Some(source) = self.token_source {
            builder = builder.token_source(source);
        }
        let executor = builder.build()?;

        info!(
            base_url = %config.base_url,
            auth = config.credentials.mode(),
            max_retries = config.max_retries,
            "medref client ready"
        );

        Ok(MedrefClient { executor: Arc::new(executor), config: Arc::new(config) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn rejects_missing_credentials() {
        let err = MedrefClient::new(ClientOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn rejects_both_credential_forms() {
        let options = ClientOptions {
            api_key: Some("key".into()),
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            ..ClientOptions::default()
        };
        assert!(matches!(MedrefClient::new(options), Err(ConfigError::ConflictingCredentials)));
    }

    #[test]
    fn rejects_client_id_without_secret() {
        let options = ClientOptions { client_id: Some("id".into()), ..ClientOptions::default() };
        assert!(matches!(
            MedrefClient::new(options),
            Err(ConfigError::IncompleteClientCredentials { missing: "client_secret" })
        ));
    }

    #[test]
    fn exposes_resolved_configuration() {
        let client = MedrefClient::new(
            ClientOptions::with_api_key("key")
                .base_url("https://sandbox.medref.dev/")
                .timeout(Duration::from_secs(5)),
        )
        .unwrap();

        assert_eq!(client.config().base_url, "https://sandbox.medref.dev");
        assert_eq!(client.executor().timeout(), Duration::from_secs(5));
        assert_eq!(client.executor().auth().mode(), "api_key");
    }

    #[test]
    fn oauth_options_select_bearer_mode() {
        let client =
            MedrefClient::new(ClientOptions::with_client_credentials("id", "secret")).unwrap();
        assert_eq!(client.executor().auth().mode(), "oauth2");
    }
}
