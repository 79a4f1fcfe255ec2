//! Request options, response envelopes and per-resource record types

pub mod batch;
pub mod cvx;
pub mod fda_label;
pub mod icd10;
pub mod loinc;
pub mod lookup;
pub mod mvx;
mod nullable;
pub mod ndc;
pub mod npi;
pub mod params;
pub mod resource;
pub mod rxnorm;
pub mod search;
pub mod snomed;

pub use batch::{BatchItem, BatchItemError, BatchRequest, BatchResponse, BatchStatus};
pub use cvx::{Cvx, CvxRecord, CvxSearch};
pub use fda_label::{FdaLabel, FdaLabelRecord, FdaLabelSearch, LabelSection};
pub use icd10::{Icd10, Icd10Record, Icd10Search};
pub use loinc::{Loinc, LoincRecord, LoincSearch};
pub use lookup::{LookupOptions, LookupResponse, ResponseMeta, Shape};
pub use mvx::{Mvx, MvxRecord, MvxSearch};
pub use ndc::{ActiveIngredient, Ndc, NdcRecord, NdcSearch};
pub use npi::{
    ConnectivityEndpoint, ConnectivityRecord, Npi, NpiAddress, NpiRecord, NpiSearch, Taxonomy,
};
pub use params::{QueryValue, SearchParams};
pub use resource::{Resource, ResourceKind};
pub use rxnorm::{RxNorm, RxNormRecord, RxNormSearch};
pub use search::{SearchOptions, SearchResponse};
pub use snomed::{Snomed, SnomedRecord, SnomedSearch};
