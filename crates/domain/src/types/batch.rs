//! Batch lookups
//!
//! A batch call always answers HTTP 200; per-item `not_found`/`invalid`
//! outcomes are data, not errors.

use serde::{Deserialize, Serialize};

use super::lookup::ResponseMeta;
use super::nullable::or_default;
use crate::impl_wire_enum;

/// Per-item outcome of a batch lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchStatus {
    Ok,
    NotFound,
    Invalid,
}

impl_wire_enum!(BatchStatus {
    Ok => "ok",
    NotFound => "not_found",
    Invalid => "invalid",
});

/// Body of `POST /v1/{resource}/_batch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub codes: Vec<String>,
}

/// Error detail on a failed batch item. Servers send either a bare string or
/// an object with `code`/`message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawItemError")]
pub struct BatchItemError {
    pub code: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemError {
    Text(String),
    Detail {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl From<RawItemError> for BatchItemError {
    fn from(raw: RawItemError) -> Self {
        match raw {
            RawItemError::Text(message) => Self { code: None, message },
            RawItemError::Detail { code, message } => {
                let message = message.or_else(|| code.clone()).unwrap_or_default();
                Self { code, message }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem<T> {
    /// The code exactly as it was submitted
    pub input: String,
    pub status: BatchStatus,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<BatchItemError>,
}

const fn none<T>() -> Option<T> {
    None
}

impl<T> BatchItem<T> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == BatchStatus::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse<T> {
    pub results: Vec<BatchItem<T>>,
    #[serde(default, deserialize_with = "or_default")]
    pub meta: ResponseMeta,
}

impl<T> BatchResponse<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Records of the items that resolved.
    pub fn found(&self) -> impl Iterator<Item = &T> {
        self.results.iter().filter(|item| item.is_ok()).filter_map(|item| item.data.as_ref())
    }

    /// Items whose status is not `ok`.
    pub fn missing(&self) -> impl Iterator<Item = &BatchItem<T>> {
        self.results.iter().filter(|item| !item.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn request_serializes_codes_array() {
        let body = BatchRequest { codes: vec!["0069-0151-01".into(), "0069-0151-02".into()] };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "codes": ["0069-0151-01", "0069-0151-02"] })
        );
    }

    #[test]
    fn mixed_outcomes_decode_as_data() {
        let response: BatchResponse<Value> = serde_json::from_value(json!({
            "results": [
                { "input": "A", "status": "ok", "data": { "code": "A" } },
                { "input": "B", "status": "not_found", "error": "no such code" },
                { "input": "??", "status": "invalid", "error": { "code": "bad_format" } }
            ]
        }))
        .unwrap();

        assert_eq!(response.len(), 3);
        assert_eq!(response.found().count(), 1);
        let missing: Vec<BatchStatus> = response.missing().map(|item| item.status).collect();
        assert_eq!(missing, vec![BatchStatus::NotFound, BatchStatus::Invalid]);

        let invalid = response.results[2].error.as_ref().unwrap();
        assert_eq!(invalid.code.as_deref(), Some("bad_format"));
        assert_eq!(invalid.message, "bad_format");
        assert_eq!(response.results[1].error.as_ref().unwrap().message, "no such code");
    }
}
