//! HTTP plumbing: the request executor, query rendering and error mapping

pub mod errors;
pub mod executor;
pub mod query;

pub use errors::{map_error_response, parse_retry_after, rate_limit_info};
pub use executor::{AuthMode, ExecutorBuilder, RequestExecutor};
pub use query::{lookup_query, search_query};
