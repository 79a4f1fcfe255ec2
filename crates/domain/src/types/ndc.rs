//! National Drug Code products and packages

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::or_default;
use super::params::SearchParams;
use super::resource::{Resource, ResourceKind};

/// Marker for the `/v1/ndc` resource.
#[derive(Debug, Clone, Copy)]
pub struct Ndc;

impl Resource for Ndc {
    const KIND: ResourceKind = ResourceKind::Ndc;
    type Record = NdcRecord;
    type Search = NdcSearch;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveIngredient {
    pub name: String,
    #[serde(default)]
    pub strength: Option<String>,
}

/// NDC record. Fields beyond `ndc` depend on the requested shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdcRecord {
    pub ndc: String,
    #[serde(default)]
    pub product_ndc: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub labeler_name: Option<String>,
    #[serde(default)]
    pub dosage_form: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub route: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub active_ingredients: Vec<ActiveIngredient>,
    #[serde(default)]
    pub marketing_category: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub package_description: Option<String>,
    /// Full-shape fields without a typed home
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /v1/ndc/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NdcSearch {
    pub q: Option<String>,
    pub ingredient: Option<String>,
    pub labeler: Option<String>,
    pub dosage_form: Option<String>,
    pub route: Vec<String>,
    pub is_active: Option<bool>,
}

impl NdcSearch {
    pub fn query(q: impl Into<String>) -> Self {
        Self { q: Some(q.into()), ..Self::default() }
    }
}

impl From<NdcSearch> for SearchParams {
    fn from(search: NdcSearch) -> Self {
        Self::new()
            .with("q", search.q)
            .with("ingredient", search.ingredient)
            .with("labeler", search.labeler)
            .with("dosage_form", search.dosage_form)
            .with("route", search.route)
            .with("is_active", search.is_active)
    }
}
