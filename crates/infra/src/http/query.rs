//! Query-string rendering for lookup and search requests

use medref_domain::{LookupOptions, SearchParams};
use url::form_urlencoded;

/// `shape` and `include` for single-record and batch lookups.
///
/// Returns `None` when neither is set so the URL carries no `?`.
pub fn lookup_query(options: &LookupOptions) -> Option<String> {
    let mut params = SearchParams::new();
    params.set("shape", options.shape.map(|shape| shape.as_str()));
    let include: Vec<String> = options
        .include
        .iter()
        .map(|section| section.trim())
        .filter(|section| !section.is_empty())
        .map(str::to_owned)
        .collect();
    params.set("include", include);
    search_query(&params)
}

/// Encode search parameters in insertion order, skipping absent values.
pub fn search_query(params: &SearchParams) -> Option<String> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut written = false;
    for (key, value) in params.rendered() {
        serializer.append_pair(key, &value);
        written = true;
    }
    written.then(|| serializer.finish())
}
