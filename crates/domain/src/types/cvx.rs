//! CDC vaccine administered (CVX) codes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/cvx` resource.
#[derive(Debug, Clone, Copy)]
pub struct Cvx;

impl Resource for Cvx {
    const KIND: ResourceKind = ResourceKind::Cvx;
    type Record = CvxRecord;
    type Search = CvxSearch;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvxRecord {
    pub code: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub vaccine_groups: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvxSearch {
    pub q: Option<String>,
    pub status: Option<String>,
    pub vaccine_group: Option<String>,
}

impl From<CvxSearch> for SearchParams {
    fn from(search: CvxSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("status", search.status)
            .with("vaccine_group", search.vaccine_group)
    }
}
