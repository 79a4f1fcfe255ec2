//! Search paging options and the search response envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lookup::{ResponseMeta, Shape};
use super::nullable::or_default;
use super::params::SearchParams;

/// Paging and shaping options common to every search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub shape: Option<Shape>,
    pub include: Vec<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
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

    /// Append `limit`, `page`, `shape` and `include` after the filters.
    pub fn apply_to(&self, params: &mut SearchParams) {
        params
            .set("limit", self.limit)
            .set("page", self.page)
            .set("shape", self.shape.map(|shape| shape.as_str()))
            .set("include", trimmed_sections(&self.include));
    }
}

/// Trimmed `include` entries with blanks dropped.
pub(crate) fn trimmed_sections(sections: &[String]) -> Vec<String> {
    sections
        .iter()
        .map(|section| section.trim())
        .filter(|section| !section.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Paged search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "or_default")]
    pub total: u64,
    /// `true` when `total` is a lower bound rather than an exact count
    #[serde(default, deserialize_with = "or_default")]
    pub total_capped: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub has_more: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub limit: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub facets: Map<String, Value>,
    #[serde(default, deserialize_with = "or_default")]
    pub meta: ResponseMeta,
}

impl<T> SearchResponse<T> {
    /// Page number to request next, if the server reports more results.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_more {
            Some(self.page.saturating_add(1))
        } else {
            None
        }
    }
}
