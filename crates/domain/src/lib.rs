//! # Medref Domain
//!
//! Data contracts for the medref reference-data client.
//!
//! This crate contains:
//! - The structured error taxonomy ([`ApiError`], [`ErrorKind`])
//! - Client configuration and credential validation
//! - Lookup, batch and search envelopes plus per-resource record types
//! - Search parameter model with ordered keys
//!
//! ## Architecture
//! - No dependencies on other medref crates
//! - No I/O; everything here is plain data

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
