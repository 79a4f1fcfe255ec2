//! FDA structured product labels

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/fda-labels` resource.
#[derive(Debug, Clone, Copy)]
pub struct FdaLabel;

impl Resource for FdaLabel {
    const KIND: ResourceKind = ResourceKind::FdaLabel;
    type Record = FdaLabelRecord;
    type Search = FdaLabelSearch;
}

/// One labelled section (indications, warnings, dosage, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSection {
    #[serde(default)]
    pub code: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "or_default")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdaLabelRecord {
    pub set_id: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub ndcs: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub sections: Vec<LabelSection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FdaLabelRecord {
    /// Find a section by its title, ignoring case.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&LabelSection> {
        self.sections.iter().find(|section| section.title.eq_ignore_ascii_case(title))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FdaLabelSearch {
    pub q: Option<String>,
    pub ndc: Option<String>,
    pub manufacturer: Option<String>,
    pub sections: Vec<String>,
}

impl From<FdaLabelSearch> for SearchParams {
    fn from(search: FdaLabelSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("ndc", search.ndc)
            .with("manufacturer", search.manufacturer)
            .with("sections", search.sections)
    }
}
