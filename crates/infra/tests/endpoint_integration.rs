//! Integration tests for the typed endpoint wrappers
//!
//! Checks path construction, query rendering, batch bodies, local argument
//! validation and not-found mapping through real HTTP round trips.

mod support;

use medref_common::testing::RecordingSleeper;
use medref_domain::{
    BatchStatus, ErrorKind, LookupOptions, Ndc, NdcSearch, Npi, SearchOptions, SearchParams, Shape,
};
use medref_infra::{Endpoint, RequestExecutor};
use serde_json::json;
use support::{api_key_options, executor, requests_to};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_key_executor(server: &MockServer) -> RequestExecutor {
    executor(api_key_options(server).resolve().unwrap(), &RecordingSleeper::new())
}

#[tokio::test]
async fn get_decodes_record_and_sends_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ndc/0069-0151-01"))
        .and(query_param("shape", "full"))
        .and(query_param("include", "packaging,labeler"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "ndc": "0069-0151-01",
                "brand_name": "Norvasc",
                "active_ingredients": [{ "name": "AMLODIPINE BESYLATE", "strength": "5 mg/1" }],
                "packaging": [{ "description": "90 TABLET in 1 BOTTLE" }]
            },
            "meta": { "request_id": "req-1", "shape": "full" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let options = LookupOptions::new().shape(Shape::Full).include(["packaging", "labeler"]);
    let response = Endpoint::<Ndc>::new(&exec).get("0069-0151-01", &options).await.unwrap();

    assert_eq!(response.data.brand_name.as_deref(), Some("Norvasc"));
    assert_eq!(response.data.active_ingredients[0].name, "AMLODIPINE BESYLATE");
    assert!(response.data.extra.contains_key("packaging"));
    assert_eq!(response.meta.shape, Some(Shape::Full));
    assert_eq!(response.meta.request_id.as_deref(), Some("req-1"));
}

#[tokio::test]
async fn get_without_options_sends_no_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/npi/1234567893"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "npi": "1234567893", "entity_type": "individual" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let response =
        Endpoint::<Npi>::new(&exec).get("1234567893", &LookupOptions::new()).await.unwrap();

    assert_eq!(response.data.npi, "1234567893");
    let requests = requests_to(&server, "/v1/npi/1234567893").await;
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn unknown_code_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ndc/invalid"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "not_found", "message": "NDC invalid not found" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let err = Endpoint::<Ndc>::new(&exec).get("invalid", &LookupOptions::new()).await.unwrap_err();

    assert_eq!(
        err.kind(),
        &ErrorKind::NotFound { resource_type: "NDC".into(), identifier: "invalid".into() }
    );
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.code(), Some("not_found"));
}

#[tokio::test]
async fn empty_identifier_fails_locally() {
    let server = MockServer::start().await;
    let exec = api_key_executor(&server);

    let err = Endpoint::<Ndc>::new(&exec).get("  ", &LookupOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::Validation { field: Some("id".into()) });
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn search_sends_filters_then_paging_without_nulls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ndc/search"))
        .and(query_param("q", "test"))
        .and(query_param("is_active", "true"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("ingredient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "ndc": "1111-2222-33" }],
            "total": 1,
            "has_more": false,
            "page": 1,
            "limit": 50
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let filters = NdcSearch { q: Some("test".into()), is_active: Some(true), ..NdcSearch::default() };
    let response = Endpoint::<Ndc>::new(&exec)
        .search(filters, &SearchOptions::new().limit(50))
        .await
        .unwrap();

    assert_eq!(response.items.len(), 1);
    assert_eq!(response.total, 1);
    assert_eq!(response.next_page(), None);

    let requests = requests_to(&server, "/v1/ndc/search").await;
    assert_eq!(requests[0].url.query(), Some("q=test&is_active=true&limit=50"));
}

#[tokio::test]
async fn raw_search_params_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/npi/search"))
        .and(query_param("state", "CA"))
        .and(query_param("specialty", "cardiology"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "total": 40,
            "has_more": true,
            "page": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let params = SearchParams::new().with("state", "CA").with("specialty", "cardiology");
    let response = Endpoint::<Npi>::new(&exec)
        .search_params(params, &SearchOptions::new().page(2))
        .await
        .unwrap();

    assert_eq!(response.next_page(), Some(3));
}

#[tokio::test]
async fn batch_posts_codes_and_keeps_per_item_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ndc/_batch"))
        .and(body_json(json!({ "codes": ["0069-0151-01", "bogus"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "input": "0069-0151-01", "status": "ok", "data": { "ndc": "0069-0151-01" } },
                { "input": "bogus", "status": "not_found", "error": "unknown NDC" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let response = Endpoint::<Ndc>::new(&exec)
        .batch(&["0069-0151-01", "bogus"], &LookupOptions::new())
        .await
        .unwrap();

    assert_eq!(response.len(), 2);
    assert_eq!(response.found().count(), 1);
    let missing: Vec<_> = response.missing().collect();
    assert_eq!(missing[0].input, "bogus");
    assert_eq!(missing[0].status, BatchStatus::NotFound);
    assert_eq!(missing[0].error.as_ref().map(|e| e.message.as_str()), Some("unknown NDC"));

    let requests = requests_to(&server, "/v1/ndc/_batch").await;
    assert_eq!(
        requests[0].headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
}

#[tokio::test]
async fn empty_batch_fails_locally() {
    let server = MockServer::start().await;
    let exec = api_key_executor(&server);

    let codes: [&str; 0] = [];
    let err = Endpoint::<Ndc>::new(&exec).batch(&codes, &LookupOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::Validation { field: Some("codes".into()) });
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn npi_connectivity_uses_subresource_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/npi/1234567893/connectivity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "npi": "1234567893",
                "endpoints": [{ "endpoint_type": "FHIR", "endpoint": "https://fhir.example.org" }],
                "direct_addresses": ["dr@direct.example.org"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let response = Endpoint::<Npi>::new(&exec).connectivity("1234567893").await.unwrap();

    assert_eq!(response.data.endpoints[0].endpoint, "https://fhir.example.org");
    assert_eq!(response.data.direct_addresses, vec!["dr@direct.example.org".to_string()]);
}

#[tokio::test]
async fn search_tolerates_null_facets_and_meta() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ndc/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "ndc": "1111-2222-33", "route": null }],
            "total": 1,
            "facets": null,
            "meta": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = api_key_executor(&server);
    let response = Endpoint::<Ndc>::new(&exec)
        .search(NdcSearch::query("amlodipine"), &SearchOptions::new())
        .await
        .unwrap();

    assert_eq!(response.items[0].ndc, "1111-2222-33");
    assert!(response.items[0].route.is_empty());
    assert!(response.facets.is_empty());
}
