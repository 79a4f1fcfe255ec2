//! Single-record lookups: shape selection and the `{data, meta}` envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use crate::impl_wire_enum;

/// Response-detail level controlling how many fields a lookup returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    Compact,
    #[default]
    Standard,
    Full,
}

impl_wire_enum!(Shape {
    Compact => "compact",
    Standard => "standard",
    Full => "full",
});

/// Query options shared by lookups, batches and searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub shape: Option<Shape>,
    /// Related sections to embed, sent comma-joined
    pub include: Vec<String>,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    #[must_use]
    pub fn include<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(sections.into_iter().map(Into::into));
        self
    }

    /// `true` when no query string should be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.is_none() && self.include.iter().all(|s| s.trim().is_empty())
    }
}

/// Response metadata. Known keys are typed; anything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{data, meta}` envelope returned by single lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse<T> {
    pub data: T,
    #[serde(default, deserialize_with = "or_default")]
    pub meta: ResponseMeta,
}
