//! # Medref Infrastructure
//!
//! I/O side of the medref client.
//!
//! This crate contains:
//! - The request executor (auth headers, timeout, retry, error mapping)
//! - Typed per-resource endpoint wrappers
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Depends on `medref-domain` for data contracts and `medref-common` for
//!   token management and backoff
//! - Contains all network and filesystem access

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::Endpoint;
pub use http::{AuthMode, ExecutorBuilder, RequestExecutor};
