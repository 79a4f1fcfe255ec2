//! LOINC laboratory and clinical observation codes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/loinc` resource.
#[derive(Debug, Clone, Copy)]
pub struct Loinc;

impl Resource for Loinc {
    const KIND: ResourceKind = ResourceKind::Loinc;
    type Record = LoincRecord;
    type Search = LoincSearch;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoincRecord {
    pub code: String,
    #[serde(default)]
    pub long_common_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub time_aspect: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoincSearch {
    pub q: Option<String>,
    pub class: Option<String>,
    pub system: Option<String>,
    pub status: Option<String>,
}

impl From<LoincSearch> for SearchParams {
    fn from(search: LoincSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("class", search.class)
            .with("system", search.system)
            .with("status", search.status)
    }
}
