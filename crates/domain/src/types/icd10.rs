//! ICD-10-CM diagnosis and ICD-10-PCS procedure codes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/icd10` resource.
#[derive(Debug, Clone, Copy)]
pub struct Icd10;

impl Resource for Icd10 {
    const KIND: ResourceKind = ResourceKind::Icd10;
    type Record = Icd10Record;
    type Search = Icd10Search;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icd10Record {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `cm` (diagnoses) or `pcs` (procedures)
    #[serde(default)]
    pub code_system: Option<String>,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Icd10Search {
    pub q: Option<String>,
    pub code_system: Option<String>,
    pub billable: Option<bool>,
    pub chapter: Option<String>,
}

impl From<Icd10Search> for SearchParams {
    fn from(search: Icd10Search) -> Self {
        Self::new()
            .with("q", search.q)
            .with("code_system", search.code_system)
            .with("billable", search.billable)
            .with("chapter", search.chapter)
    }
}
