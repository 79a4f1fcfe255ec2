//! RxNorm concepts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/rxnorm` resource.
#[derive(Debug, Clone, Copy)]
pub struct RxNorm;

impl Resource for RxNorm {
    const KIND: ResourceKind = ResourceKind::RxNorm;
    type Record = RxNormRecord;
    type Search = RxNormSearch;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RxNormRecord {
    pub rxcui: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Term type, e.g. `SCD`, `SBD`, `IN`
    #[serde(default)]
    pub tty: Option<String>,
    #[serde(default)]
    pub synonym: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub ndcs: Vec<String>,
    #[serde(default)]
    pub suppressed: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RxNormSearch {
    pub q: Option<String>,
    pub tty: Vec<String>,
    pub ingredient: Option<String>,
}

impl From<RxNormSearch> for SearchParams {
    fn from(search: RxNormSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("tty", search.tty)
            .with("ingredient", search.ingredient)
    }
}
