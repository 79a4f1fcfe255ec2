//! National Provider Identifier registry entries and connectivity endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/npi` resource.
#[derive(Debug, Clone, Copy)]
pub struct Npi;

impl Resource for Npi {
    const KIND: ResourceKind = ResourceKind::Npi;
    type Record = NpiRecord;
    type Search = NpiSearch;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub primary: bool,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpiAddress {
    /// `location` or `mailing`
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpiRecord {
    pub npi: String,
    /// `individual` or `organization`
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub enumeration_date: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub taxonomies: Vec<Taxonomy>,
    #[serde(default, deserialize_with = "or_default")]
    pub addresses: Vec<NpiAddress>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NpiRecord {
    /// The taxonomy flagged primary, falling back to the first listed.
    #[must_use]
    pub fn primary_taxonomy(&self) -> Option<&Taxonomy> {
        self.taxonomies.iter().find(|taxonomy| taxonomy.primary).or_else(|| self.taxonomies.first())
    }
}

/// Electronic endpoint registered for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityEndpoint {
    #[serde(default)]
    pub endpoint_type: Option<String>,
    pub endpoint: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
}

/// Payload of `GET /v1/npi/{npi}/connectivity`. Not shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityRecord {
    pub npi: String,
    #[serde(default, deserialize_with = "or_default")]
    pub endpoints: Vec<ConnectivityEndpoint>,
    #[serde(default, deserialize_with = "or_default")]
    pub direct_addresses: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /v1/npi/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpiSearch {
    pub q: Option<String>,
    pub name: Option<String>,
    pub entity_type: Option<String>,
    pub taxonomy: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl From<NpiSearch> for SearchParams {
    fn from(search: NpiSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("name", search.name)
            .with("entity_type", search.entity_type)
            .with("taxonomy", search.taxonomy)
            .with("city", search.city)
            .with("state", search.state)
            .with("postal_code", search.postal_code)
    }
}
