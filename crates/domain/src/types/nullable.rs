//! Null-tolerant field decoding

use serde::{Deserialize, Deserializer};

/// Decode a field that the server may send as an explicit `null`, falling
/// back to the type's default. Pair with `#[serde(default)]` for absent keys.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
