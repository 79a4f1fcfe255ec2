//! Resource catalogue
//!
//! Each code system the API serves is described once by a [`ResourceKind`]
//! (URL segment + display label) and a zero-sized marker implementing
//! [`Resource`], which ties the kind to its record and search filter types.

use std::fmt;

use serde::de::DeserializeOwned;

use super::params::SearchParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Ndc,
    Npi,
    RxNorm,
    Loinc,
    Icd10,
    Cvx,
    Mvx,
    FdaLabel,
    Snomed,
}

impl ResourceKind {
    pub const ALL: [Self; 9] = [
        Self::Ndc,
        Self::Npi,
        Self::RxNorm,
        Self::Loinc,
        Self::Icd10,
        Self::Cvx,
        Self::Mvx,
        Self::FdaLabel,
        Self::Snomed,
    ];

    /// Path segment under `/v1`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Ndc => "ndc",
            Self::Npi => "npi",
            Self::RxNorm => "rxnorm",
            Self::Loinc => "loinc",
            Self::Icd10 => "icd10",
            Self::Cvx => "cvx",
            Self::Mvx => "mvx",
            Self::FdaLabel => "fda-labels",
            Self::Snomed => "snomed",
        }
    }

    /// Human-facing name, used as the resource type of not-found errors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ndc => "NDC",
            Self::Npi => "NPI",
            Self::RxNorm => "RxNorm",
            Self::Loinc => "LOINC",
            Self::Icd10 => "ICD-10",
            Self::Cvx => "CVX",
            Self::Mvx => "MVX",
            Self::FdaLabel => "FDA Label",
            Self::Snomed => "SNOMED",
        }
    }

    /// Reverse of [`ResourceKind::path`].
    #[must_use]
    pub fn from_path(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path().eq_ignore_ascii_case(segment))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Binds a resource kind to its payload types.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Record returned by lookups, batch items and search hits.
    type Record: DeserializeOwned + Send + 'static;

    /// Typed search filters for this resource.
    type Search: Into<SearchParams> + Default + Send;
}
