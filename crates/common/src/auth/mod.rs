//! OAuth2 client-credentials authentication
//!
//! # Architecture
//!
//! ```text
//! RequestExecutor ──► TokenSource (trait)
//!                          │
//!                     TokenManager     cache + single-flight refresh
//!                          │
//!                     TokenExchange (trait)
//!                          │
//!                     OAuthClient      POST {token_url}, form-encoded grant
//! ```
//!
//! The token manager hands out a cached bearer token until its
//! safety-margined expiry passes. At most one exchange is in flight per
//! manager; every caller arriving while it is pending receives the same
//! token or the same error. Failures are never retried here.

pub mod client;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::OAuthClient;
pub use token_manager::TokenManager;
pub use traits::{TokenExchange, TokenSource};
pub use types::TokenResponse;
