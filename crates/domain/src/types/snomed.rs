//! SNOMED CT clinical concepts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/snomed` resource.
#[derive(Debug, Clone, Copy)]
pub struct Snomed;

impl Resource for Snomed {
    const KIND: ResourceKind = ResourceKind::Snomed;
    type Record = SnomedRecord;
    type Search = SnomedSearch;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnomedRecord {
    pub concept_id: String,
    /// Fully specified name
    #[serde(default)]
    pub fsn: Option<String>,
    #[serde(default)]
    pub preferred_term: Option<String>,
    #[serde(default)]
    pub semantic_tag: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub parents: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnomedSearch {
    pub q: Option<String>,
    pub semantic_tag: Option<String>,
    pub active: Option<bool>,
}

impl From<SnomedSearch> for SearchParams {
    fn from(search: SnomedSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("semantic_tag", search.semantic_tag)
            .with("active", search.active)
    }
}
