//! Strict-mode validation: detect fields a variant does not declare.
//!
//! Uses `serde_ignored` to deserialize the variant type from the merged fields
//! and capture any keys the type doesn't consume. Paths are dotted, so an
//! unknown key inside a nested struct is reported as `Style.Bogus`. In lenient
//! mode the same keys are dropped and logged.

use serde::{Deserialize, Deserializer};

use crate::error::PolygenError;

/// Deserialize `T` from `fields`, rejecting unconsumed keys when `strict`.
///
/// `fields` is any JSON-backed deserializer: a plain `Value` or a patch
/// layered over a previous value.
pub fn decode_checked<'de, T, D>(
    variant: &str,
    fields: D,
    strict: bool,
) -> Result<T, PolygenError>
where
    T: Deserialize<'de>,
    D: Deserializer<'de, Error = serde_json::Error>,
{
    let mut unknown_fields: Vec<String> = Vec::new();

    let decoded: T = serde_ignored::deserialize(fields, |ignored_path| {
        unknown_fields.push(ignored_path.to_string());
    })
    .map_err(|source| PolygenError::VariantDecodeFailure {
        variant: variant.to_string(),
        source,
    })?;

    match unknown_fields.into_iter().next() {
        Some(field) if strict => Err(PolygenError::StrictFieldRejection {
            variant: variant.to_string(),
            field,
        }),
        Some(field) => {
            tracing::debug!(variant, field = %field, "dropping unknown field");
            Ok(decoded)
        }
        None => Ok(decoded),
    }
}
