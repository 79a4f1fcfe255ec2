#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use medref_common::testing::RecordingSleeper;
use medref_domain::{ClientConfig, ClientOptions};
use medref_infra::RequestExecutor;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth2/token";

/// API-key options pointed at `server` with a 1 s backoff base.
pub fn api_key_options(server: &MockServer) -> ClientOptions {
    ClientOptions::with_api_key("test-key")
        .base_url(server.uri())
        .retry_delay(Duration::from_millis(1000))
}

/// Client-credentials options whose token endpoint lives on `server`.
pub fn oauth_options(server: &MockServer) -> ClientOptions {
    ClientOptions::with_client_credentials("client-id", "client-secret")
        .token_url(format!("{}{TOKEN_PATH}", server.uri()))
        .base_url(server.uri())
        .retry_delay(Duration::from_millis(1000))
}

/// Executor whose backoff waits are recorded instead of slept.
pub fn executor(config: ClientConfig, sleeper: &RecordingSleeper) -> RequestExecutor {
    RequestExecutor::builder(config)
        .sleeper(Arc::new(sleeper.clone()))
        .build()
        .expect("executor should build")
}

/// Token endpoint answering `tok-1`, `tok-2`, ... one per exchange.
/// Returns the exchange counter.
pub async fn mount_numbered_tokens(server: &MockServer) -> Arc<AtomicUsize> {
    let issued = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&issued);
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(move |_: &Request| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            ResponseTemplate::new(200).set_body_json(json!({
                "access_token": format!("tok-{n}"),
                "token_type": "Bearer",
                "expires_in": 3600
            }))
        })
        .mount(server)
        .await;
    issued
}

/// Requests received on `request_path`, in arrival order.
pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}
