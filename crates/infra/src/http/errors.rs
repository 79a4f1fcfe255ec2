//! Mapping of non-success responses onto the client error taxonomy
//!
//! Error bodies are parsed leniently. The service normally answers with
//! `{"error": {"code", "message", ...}}` but a flat object or a non-JSON body
//! still yields a usable error: only the status code is authoritative.

use chrono::{DateTime, Utc};
use medref_domain::constants::{
    API_PREFIX, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
    RETRY_AFTER_HEADER,
};
use medref_domain::{ApiError, QuotaDiscriminator, QuotaInfo, RateLimitInfo, ResourceKind};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};

/// Fields pulled out of an error body.
#[derive(Debug, Default)]
struct ErrorBody {
    object: Option<Value>,
    code: Option<String>,
    message: Option<String>,
    field: Option<String>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let object = match value.get("error") {
            Some(inner @ Value::Object(_)) => inner.clone(),
            _ => value,
        };
        let Some(fields) = object.as_object() else {
            return Self::default();
        };

        Self {
            code: string_field(fields, "code"),
            message: string_field(fields, "message")
                .or_else(|| string_field(fields, "error_description"))
                .or_else(|| string_field(fields, "detail")),
            field: string_field(fields, "field").or_else(|| string_field(fields, "param")),
            object: Some(object),
        }
    }

    fn quota(&self) -> QuotaInfo {
        let quota = self.object.as_ref().and_then(|object| object.get("quota"));
        let lookup = |key: &str| {
            quota
                .and_then(|quota| quota.get(key))
                .or_else(|| self.object.as_ref().and_then(|object| object.get(key)))
        };
        QuotaInfo {
            quota_limit: lookup("limit").or_else(|| lookup("quota_limit")).and_then(Value::as_u64),
            quota_used: lookup("used").or_else(|| lookup("quota_used")).and_then(Value::as_u64),
            quota_reset: lookup("reset").or_else(|| lookup("quota_reset")).and_then(parse_instant),
        }
    }
}

/// RFC 3339 string or unix seconds.
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => {
            DateTime::parse_from_rfc3339(text).ok().map(|instant| instant.with_timezone(&Utc))
        }
        Value::Number(number) => DateTime::from_timestamp(number.as_i64()?, 0),
        _ => None,
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).filter(|text| !text.is_empty()).map(str::to_owned)
}

/// Map a non-2xx response onto an [`ApiError`].
///
/// | Status        | Kind                                             |
/// |---------------|--------------------------------------------------|
/// | 400, 422      | validation (with `field` when the body names it) |
/// | 401, 403      | authentication                                   |
/// | 404           | not found (resource and identifier from `path`)  |
/// | 429           | quota exceeded when the discriminator matches, otherwise rate limit |
/// | other 4xx     | validation                                       |
/// | 5xx and rest  | server                                           |
///
/// Every error carries the HTTP status and the body's `code` when present.
pub fn map_error_response(
    status: StatusCode,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
    quota: &QuotaDiscriminator,
) -> ApiError {
    let parsed = ErrorBody::parse(body);
    let message = parsed
        .message
        .clone()
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let error = match status.as_u16() {
        400 | 422 => ApiError::validation(message, parsed.field.clone()),
        401 | 403 => ApiError::authentication(message),
        404 => {
            let (resource_type, identifier) = resource_from_path(path);
            ApiError::not_found(message, resource_type, identifier)
        }
        429 => {
            let quota_hit = parsed.object.as_ref().is_some_and(|object| quota.matches(object));
            if quota_hit {
                ApiError::quota_exceeded(message, parsed.quota())
            } else {
                ApiError::rate_limited(message, rate_limit_info(headers))
            }
        }
        400..=499 => ApiError::validation(message, parsed.field.clone()),
        _ => ApiError::server(message),
    };

    error.with_status(status.as_u16()).with_code_opt(parsed.code)
}

/// `Retry-After` as whole seconds. HTTP-date values are not honoured.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    header_u64(headers, RETRY_AFTER_HEADER)
}

/// Rate-limit snapshot carried by `x-ratelimit-*` headers.
pub fn rate_limit_info(headers: &HeaderMap) -> RateLimitInfo {
    RateLimitInfo {
        retry_after: parse_retry_after(headers),
        limit: header_u64(headers, RATE_LIMIT_LIMIT_HEADER),
        remaining: header_u64(headers, RATE_LIMIT_REMAINING_HEADER),
        reset: header_u64(headers, RATE_LIMIT_RESET_HEADER)
            .and_then(|seconds| i64::try_from(seconds).ok())
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0)),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Resource label and identifier for `/v1/{resource}/{id}[/...]`.
fn resource_from_path(path: &str) -> (String, String) {
    let path = path.split('?').next().unwrap_or_default();
    let trimmed = path.strip_prefix(API_PREFIX).unwrap_or(path);
    let mut segments = trimmed.split('/').filter(|segment| !segment.is_empty());

    let resource = segments.next().unwrap_or_default();
    let resource_type = ResourceKind::from_path(resource)
        .map_or_else(|| resource.to_string(), |kind| kind.label().to_string());
    let identifier = segments
        .next()
        .map(|raw| urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |id| id.into_owned()))
        .unwrap_or_default();

    (resource_type, identifier)
}

#[cfg(test)]
mod tests {
    use medref_domain::ErrorKind;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    fn map(status: u16, path: &str, body: Value) -> ApiError {
        map_error_response(
            StatusCode::from_u16(status).unwrap(),
            path,
            &HeaderMap::new(),
            body.to_string().as_bytes(),
            &QuotaDiscriminator::default(),
        )
    }

    #[test]
    fn not_found_names_resource_and_decoded_identifier() {
        let err = map(404, "/v1/ndc/0069%2F0151", json!({ "error": { "message": "no such code" } }));
        match err.kind() {
            ErrorKind::NotFound { resource_type, identifier } => {
                assert_eq!(resource_type, "NDC");
                assert_eq!(identifier, "0069/0151");
            }
            other => panic!("expected not found, got {other:?}"),
        }
        assert_eq!(err.message(), "no such code");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn not_found_under_subresource_uses_parent_identifier() {
        let err = map(404, "/v1/npi/1234567893/connectivity", json!({}));
        assert!(matches!(
            err.kind(),
            ErrorKind::NotFound { resource_type, identifier }
                if resource_type == "NPI" && identifier == "1234567893"
        ));
    }

    #[test]
    fn validation_keeps_field_and_code() {
        let err = map(
            422,
            "/v1/ndc/search",
            json!({ "error": { "code": "invalid_param", "message": "bad limit", "field": "limit" } }),
        );
        assert_eq!(err.kind(), &ErrorKind::Validation { field: Some("limit".into()) });
        assert_eq!(err.code(), Some("invalid_param"));
    }

    #[test]
    fn forbidden_is_authentication() {
        let err = map(403, "/v1/ndc/1", json!({ "message": "scope missing" }));
        assert_eq!(err.kind(), &ErrorKind::Authentication);
        assert_eq!(err.message(), "scope missing");
    }

    #[test]
    fn unparseable_body_falls_back_to_reason_phrase() {
        let err = map_error_response(
            StatusCode::BAD_GATEWAY,
            "/v1/ndc/1",
            &HeaderMap::new(),
            b"<html>bad gateway</html>",
            &QuotaDiscriminator::default(),
        );
        assert_eq!(err.kind(), &ErrorKind::Server);
        assert_eq!(err.message(), "Bad Gateway");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn too_many_requests_reads_rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("60"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("100"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let err = map_error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "/v1/ndc/1",
            &headers,
            b"{}",
            &QuotaDiscriminator::default(),
        );
        let ErrorKind::RateLimit(info) = err.kind() else {
            panic!("expected rate limit, got {:?}", err.kind());
        };
        assert_eq!(info.retry_after, Some(60));
        assert_eq!(info.limit, Some(100));
        assert_eq!(info.remaining, Some(0));
        assert_eq!(info.reset.map(|reset| reset.timestamp()), Some(1_700_000_000));
        assert_eq!(err.retry_after(), Some(60));
    }

    #[test]
    fn quota_code_selects_quota_exceeded() {
        let err = map(
            429,
            "/v1/ndc/1",
            json!({ "error": {
                "code": "QUOTA_EXCEEDED",
                "message": "monthly quota used",
                "quota": { "limit": 10000, "used": 10000, "reset": "2026-11-01T00:00:00Z" }
            }}),
        );
        let ErrorKind::QuotaExceeded(info) = err.kind() else {
            panic!("expected quota, got {:?}", err.kind());
        };
        assert_eq!(info.quota_limit, Some(10_000));
        assert_eq!(info.quota_used, Some(10_000));
        assert_eq!(info.quota_reset.map(|reset| reset.timestamp()), Some(1_793_491_200));
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn custom_discriminator_field_is_honoured() {
        let discriminator =
            QuotaDiscriminator { field: "type".into(), values: vec!["quota".into()] };
        let err = map_error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "/v1/ndc/1",
            &HeaderMap::new(),
            json!({ "type": "quota", "code": "quota_exceeded" }).to_string().as_bytes(),
            &discriminator,
        );
        assert!(matches!(err.kind(), ErrorKind::QuotaExceeded(_)));
    }

    #[test]
    fn retry_after_ignores_http_dates() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn unknown_client_errors_are_validation() {
        let err = map(409, "/v1/ndc/_batch", json!({}));
        assert_eq!(err.kind(), &ErrorKind::Validation { field: None });
        assert_eq!(err.status(), Some(409));
    }
}
