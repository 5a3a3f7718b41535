//! Domain model module declarations.

use serde::{Deserialize, Deserializer};

pub mod article;
pub mod correlation;
pub mod ticket;
pub mod user;
pub mod webhook;

/// Deserialize an optional field as its default when Zammad sends `null`.
///
/// Zammad serializes unset string columns (names, email, body) as `null`
/// rather than omitting them, which `#[serde(default)]` alone rejects.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
