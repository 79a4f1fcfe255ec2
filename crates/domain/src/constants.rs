//! Client constants
//!
//! Centralized location for defaults, header names and wire constants used
//! throughout the client.

use std::time::Duration;

// Endpoints
pub const DEFAULT_BASE_URL: &str = "https://api.medref.dev";
pub const DEFAULT_TOKEN_URL: &str = "https://api.medref.dev/oauth2/token";
pub const API_PREFIX: &str = "/v1";
pub const BATCH_SEGMENT: &str = "_batch";
pub const SEARCH_SEGMENT: &str = "search";
pub const CONNECTIVITY_SEGMENT: &str = "connectivity";

// Request execution defaults
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

// Token handling
/// Subtracted from `expires_in` so tokens refresh before the server rejects them.
pub const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(60);
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// Headers
pub const API_KEY_HEADER: &str = "x-api-key";
pub const RETRY_AFTER_HEADER: &str = "retry-after";
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";
pub const JSON_CONTENT_TYPE: &str = "application/json";

// Identity
pub const USER_AGENT_PRODUCT: &str = "medref-rust";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

// Quota discrimination on 429 bodies
pub const DEFAULT_QUOTA_FIELD: &str = "code";
pub const DEFAULT_QUOTA_VALUE: &str = "quota_exceeded";
