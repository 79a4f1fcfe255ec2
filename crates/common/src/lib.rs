//! Shared runtime pieces for the medref client.
//!
//! - [`auth`]: OAuth2 client-credentials exchange and the caching,
//!   single-flight [`auth::TokenManager`]
//! - [`resilience`]: exponential backoff schedule and sleep abstraction
//! - [`time`]: clock abstraction used for token expiry
//! - `testing` (feature `test-utils`): mock clock and recording sleeper

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod resilience;
pub mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{OAuthClient, TokenExchange, TokenManager, TokenResponse, TokenSource};
pub use resilience::{Backoff, Sleeper, TokioSleeper};
pub use time::{Clock, SystemClock};
