//! # medref
//!
//! Typed async client for the medref healthcare reference-data API: NDC,
//! NPI, RxNorm, LOINC, ICD-10, CVX, MVX, FDA labels and SNOMED lookups,
//! batch lookups and searches.
//!
//! Authentication is either a static API key or OAuth2 client credentials
//! with a cached, single-flight token. Every call goes through one request
//! executor that applies the timeout, retry policy and error mapping, so all
//! failures arrive as a structured [`ApiError`].

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod logging;

pub use client::{MedrefClient, MedrefClientBuilder};
pub use logging::{init_tracing, init_tracing_with, log_api_error};
pub use medref_domain::{
    ActiveIngredient, ApiError, BatchItem, BatchItemError, BatchResponse, BatchStatus,
    ClientConfig, ClientCredentials, ClientOptions, ConfigError, ConnectivityEndpoint,
    ConnectivityRecord, Credentials, Cvx, CvxRecord, CvxSearch, ErrorKind, FdaLabel,
    FdaLabelRecord, FdaLabelSearch, Icd10, Icd10Record, Icd10Search, LabelSection, Loinc,
    LoincRecord, LoincSearch, LookupOptions, LookupResponse, Mvx, MvxRecord, MvxSearch, Ndc,
    NdcRecord, NdcSearch, Npi, NpiAddress, NpiRecord, NpiSearch, QueryValue, QuotaDiscriminator,
    QuotaInfo, RateLimitInfo, Resource, ResourceKind, ResponseMeta, Result, RxNorm, RxNormRecord,
    RxNormSearch, SearchOptions, SearchParams, SearchResponse, Shape, Snomed, SnomedRecord,
    SnomedSearch, Taxonomy,
};
pub use medref_infra::{AuthMode, Endpoint, RequestExecutor};
