//! Per-resource endpoint wrappers
//!
//! Every resource exposes the same three operations under `/v1/{resource}`:
//! single lookup, batch lookup and search. [`Endpoint`] implements them once,
//! generic over the [`Resource`] marker; resource-specific extras such as NPI
//! connectivity are inherent impls on the concrete instantiation.

use std::fmt;
use std::marker::PhantomData;

use medref_domain::constants::{API_PREFIX, BATCH_SEGMENT, CONNECTIVITY_SEGMENT, SEARCH_SEGMENT};
use medref_domain::{
    ApiError, BatchRequest, BatchResponse, ConnectivityRecord, LookupOptions, LookupResponse, Npi,
    Resource, SearchOptions, SearchParams, SearchResponse,
};
use tracing::instrument;

use crate::http::RequestExecutor;

/// Typed view of one resource family.
pub struct Endpoint<'a, R: Resource> {
    executor: &'a RequestExecutor,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for Endpoint<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource> Copy for Endpoint<'_, R> {}

impl<R: Resource> fmt::Debug for Endpoint<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").field("resource", &R::KIND).finish_non_exhaustive()
    }
}

impl<'a, R: Resource> Endpoint<'a, R> {
    #[must_use]
    pub const fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor, _resource: PhantomData }
    }

    /// `/v1/{resource}`
    #[must_use]
    pub fn collection_path() -> String {
        format!("{API_PREFIX}/{}", R::KIND.path())
    }

    /// `/v1/{resource}/{id}` with `id` percent-encoded as one segment.
    #[must_use]
    pub fn record_path(id: &str) -> String {
        format!("{}/{}", Self::collection_path(), urlencoding::encode(id))
    }

    /// Fetch one record by its identifier.
    ///
    /// # Errors
    /// Returns a validation error for an empty identifier without making a
    /// request; otherwise any [`ApiError`] from the executor, notably
    /// not-found for unknown codes.
    #[instrument(skip(self, options), fields(resource = R::KIND.path()))]
    pub async fn get(
        &self,
        id: &str,
        options: &LookupOptions,
    ) -> Result<LookupResponse<R::Record>, ApiError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ApiError::validation(
                format!("{} identifier must not be empty", R::KIND.label()),
                Some("id".to_string()),
            ));
        }
        self.executor.get(&Self::record_path(id), options).await
    }

    /// Fetch many records in one round trip via `POST /v1/{resource}/_batch`.
    ///
    /// Results come back in input order, one per code, each with its own
    /// status; unknown codes do not fail the call.
    ///
    /// # Errors
    /// Returns a validation error for an empty code list without making a
    /// request; otherwise any [`ApiError`] from the executor.
    #[instrument(skip(self, codes, options), fields(resource = R::KIND.path(), count = codes.len()))]
    pub async fn batch<S>(
        &self,
        codes: &[S],
        options: &LookupOptions,
    ) -> Result<BatchResponse<R::Record>, ApiError>
    where
        S: AsRef<str> + Sync,
    {
        if codes.is_empty() {
            return Err(ApiError::validation(
                "batch lookup requires at least one code",
                Some("codes".to_string()),
            ));
        }
        let request = BatchRequest { codes: codes.iter().map(|code| code.as_ref().to_string()).collect() };
        let path = format!("{}/{BATCH_SEGMENT}", Self::collection_path());
        self.executor.post(&path, &request, options).await
    }

    /// Search with the resource's typed filters plus paging options.
    ///
    /// Filters are sent first, then `limit`, `page`, `shape`, `include`.
    ///
    /// # Errors
    /// Returns any [`ApiError`] from the executor.
    pub async fn search(
        &self,
        filters: R::Search,
        options: &SearchOptions,
    ) -> Result<SearchResponse<R::Record>, ApiError> {
        self.search_params(filters.into(), options).await
    }

    /// Search with raw parameters, for filters without a typed field.
    ///
    /// # Errors
    /// Returns any [`ApiError`] from the executor.
    #[instrument(skip(self, params, options), fields(resource = R::KIND.path()))]
    pub async fn search_params(
        &self,
        mut params: SearchParams,
        options: &SearchOptions,
    ) -> Result<SearchResponse<R::Record>, ApiError> {
        options.apply_to(&mut params);
        let path = format!("{}/{SEARCH_SEGMENT}", Self::collection_path());
        self.executor.search(&path, &params).await
    }
}

impl Endpoint<'_, Npi> {
    /// Electronic endpoints and Direct addresses registered for a provider.
    ///
    /// # Errors
    /// Returns a validation error for an empty NPI without making a request;
    /// otherwise any [`ApiError`] from the executor.
    #[instrument(skip(self))]
    pub async fn connectivity(&self, npi: &str) -> Result<LookupResponse<ConnectivityRecord>, ApiError> {
        let npi = npi.trim();
        if npi.is_empty() {
            return Err(ApiError::validation("NPI must not be empty", Some("npi".to_string())));
        }
        let path = format!("{}/{CONNECTIVITY_SEGMENT}", Self::record_path(npi));
        self.executor.get(&path, &LookupOptions::default()).await
    }
}
