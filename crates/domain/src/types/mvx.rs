//! Vaccine manufacturer (MVX) codes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/mvx` resource.
#[derive(Debug, Clone, Copy)]
pub struct Mvx;

impl Resource for Mvx {
    const KIND: ResourceKind = ResourceKind::Mvx;
    type Record = MvxRecord;
    type Search = MvxSearch;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MvxRecord {
    pub code: String,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MvxSearch {
    pub q: Option<String>,
    pub status: Option<String>,
}

impl From<MvxSearch> for SearchParams {
    fn from(search: MvxSearch) -> Self {
        Self::new().with("q", search.q).with("status", search.status)
    }
}
