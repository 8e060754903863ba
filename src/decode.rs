//! Decoding with patch/merge semantics.
//!
//! One decode call runs these steps against a raw JSON value, the current
//! active instance (if any) and a [`DecodeContext`]:
//!
//! 1. `null` decodes to the empty container.
//! 2. Read only the discriminator from the object (position is irrelevant).
//! 3. Resolve the effective discriminator ([`resolve_effective`]).
//! 4. Resolve the target variant through the registry.
//! 5. Decode the payload, minus the discriminator key:
//!    - **merge** when the target is the active variant: the payload is layered
//!      over the active instance's fields, so absent fields keep their values;
//!    - **fresh** otherwise: the payload is layered over `T::default()`, so
//!      nothing survives from a previous variant.
//!
//! Nothing is committed until the variant decode succeeded. Value-kind
//! variants produce a new owned value; reference-kind variants write through
//! the existing [`Shared`] handle as the very last step. Any error therefore
//! leaves the caller's state exactly as it was.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PolygenError;
use crate::encode::to_wire_value;
use crate::merge::Layered;
use crate::resolve::resolve_effective;
use crate::shared::Shared;
use crate::types::DecodeContext;
use crate::validate::decode_checked;
use crate::variant::VariantSet;

/// Decode `raw` against `current`, returning the new active instance
/// (`None` for the empty container).
///
/// For value-kind variants `current` is only read. For a reference-kind
/// merge, the active instance's [`Shared`] storage is updated in place on
/// success and the returned instance aliases it.
pub fn decode<V: VariantSet>(
    raw: Value,
    current: Option<&V>,
    ctx: &DecodeContext,
) -> Result<Option<V>, PolygenError> {
    let mut payload = match raw {
        Value::Null => return Ok(None),
        Value::Object(fields) => fields,
        other => {
            return Err(PolygenError::MalformedInput(format!(
                "expected a JSON object or null, found {}",
                json_kind(&other)
            )));
        }
    };

    let schema = V::schema();
    let registry = schema.registry();

    let incoming = match payload.remove(&ctx.discriminator) {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name),
        Some(other) => {
            return Err(PolygenError::MalformedInput(format!(
                "discriminator field '{}' must be a string, found {}",
                ctx.discriminator,
                json_kind(&other)
            )));
        }
    };

    let current_name = current
        .map(|active| registry.resolve_by_identity(active.identity()))
        .transpose()?
        .map(|desc| desc.name.as_str());

    // The default only matters when nothing else names a variant.
    let default_name = match (&incoming, current_name, ctx.default_variant.as_deref()) {
        (None, None, Some(identity)) => Some(
            registry
                .resolve_by_identity(identity)
                .map_err(|_| PolygenError::UnknownDefaultVariant {
                    type_name: schema.type_name().to_string(),
                    variant: identity.to_string(),
                })?
                .name
                .as_str(),
        ),
        _ => None,
    };

    let effective = resolve_effective(incoming.as_deref(), current_name, default_name).map_err(
        |_| PolygenError::MissingDiscriminator {
            field: ctx.discriminator.clone(),
        },
    )?;

    let target = registry.resolve_by_discriminator(effective)?;
    let merge_target = current.filter(|active| active.identity() == target.identity);

    match (merge_target, current) {
        (Some(_), _) => tracing::trace!(
            type_name = schema.type_name(),
            variant = %target.name,
            "merge decode"
        ),
        (None, Some(active)) => tracing::debug!(
            type_name = schema.type_name(),
            from = active.identity(),
            to = %target.identity,
            "variant switch, fresh decode"
        ),
        (None, None) => tracing::trace!(
            type_name = schema.type_name(),
            variant = %target.name,
            "fresh decode"
        ),
    }

    V::decode_fields(&target.identity, merge_target, payload, ctx.strict).map(Some)
}

/// Decode a value-kind variant: merge onto `current` or onto `T::default()`.
pub fn decode_value_variant<T>(
    variant: &str,
    current: Option<&T>,
    payload: Map<String, Value>,
    strict: bool,
) -> Result<T, PolygenError>
where
    T: Serialize + DeserializeOwned + Default,
{
    match current {
        Some(existing) => decode_onto(variant, existing, payload, strict),
        None => decode_onto(variant, &T::default(), payload, strict),
    }
}

/// Decode a reference-kind variant.
///
/// Merge writes the decoded value into the existing handle under its write
/// lock and returns that same handle; fresh decode allocates a new one.
pub fn decode_shared_variant<T>(
    variant: &str,
    current: Option<&Shared<T>>,
    payload: Map<String, Value>,
    strict: bool,
) -> Result<Shared<T>, PolygenError>
where
    T: Serialize + DeserializeOwned + Default,
{
    match current {
        Some(handle) => {
            let mut guard = handle.write();
            let merged = decode_onto(variant, &*guard, payload, strict)?;
            *guard = merged;
            drop(guard);
            Ok(handle.clone())
        }
        None => decode_onto(variant, &T::default(), payload, strict).map(Shared::new),
    }
}

/// Decode `payload` layered over the structural encoding of `base`.
fn decode_onto<T>(
    variant: &str,
    base: &T,
    payload: Map<String, Value>,
    strict: bool,
) -> Result<T, PolygenError>
where
    T: Serialize + DeserializeOwned,
{
    let seeded = to_wire_value(base).map_err(|source| PolygenError::EncodeFailure {
        variant: variant.to_string(),
        source,
    })?;

    match seeded {
        fields @ Value::Object(_) => {
            decode_checked(variant, Layered::new(fields, Value::Object(payload)), strict)
        }
        // Unit structs carry no fields; any key is undeclared.
        Value::Null => match payload.into_iter().next() {
            Some((field, _)) if strict => Err(PolygenError::StrictFieldRejection {
                variant: variant.to_string(),
                field,
            }),
            _ => decode_checked(variant, Value::Null, strict),
        },
        other => Err(PolygenError::EncodeFailure {
            variant: variant.to_string(),
            source: serde::ser::Error::custom(format!(
                "variant must serialize as a JSON object, found {}",
                json_kind(&other)
            )),
        }),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
