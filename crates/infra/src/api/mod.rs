//! Typed endpoint wrappers over the request executor
//!
//! # Architecture
//!
//! - One generic [`Endpoint`] per resource marker (`Ndc`, `Npi`, ...)
//! - Path construction and local argument validation live here
//! - Auth, retry and error mapping are delegated to
//!   [`RequestExecutor`](crate::http::RequestExecutor)

pub mod endpoint;

pub use endpoint::Endpoint;
